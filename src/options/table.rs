//! Option tables
//!
//! One enum per scope. Each variant maps to a static [`OptionDescriptor`];
//! codes match the engine's published option list and must not drift.

use super::{OptionDescriptor, ParamKind, Scope};

/// Declares a scope's option enum together with its descriptor table
macro_rules! option_table {
    (
        $(#[$meta:meta])*
        $enum_name:ident ($scope:ident) {
            $(
                $variant:ident = $code:literal, $name:literal, $kind:ident, $deprecated:literal, $desc:literal;
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $enum_name {
            $($variant,)+
        }

        impl $enum_name {
            /// Every option of this scope, in code order
            pub const ALL: &'static [$enum_name] = &[$($enum_name::$variant,)+];

            /// Static descriptor for this option
            pub fn descriptor(self) -> &'static OptionDescriptor {
                match self {
                    $(
                        $enum_name::$variant => &OptionDescriptor {
                            scope: Scope::$scope,
                            name: $name,
                            code: $code,
                            kind: ParamKind::$kind,
                            deprecated: $deprecated,
                            description: $desc,
                        },
                    )+
                }
            }

            /// Wire code
            pub fn code(self) -> u32 {
                self.descriptor().code
            }

            /// Resolve a symbolic name (case-insensitive, `-` and `_` interchangeable)
            pub fn from_name(name: &str) -> Option<Self> {
                let wanted = name.replace('-', "_");
                Self::ALL
                    .iter()
                    .copied()
                    .find(|o| o.descriptor().name.eq_ignore_ascii_case(&wanted))
            }
        }
    };
}

option_table! {
    /// Options applied once to the client network layer
    NetworkOption (Network) {
        LocalAddress = 10, "local_address", String, true, "IP:PORT to bind the client to";
        UseObjectSerializer = 11, "use_object_serializer", Int64, false, "Enable the object serializer for network traffic (0 is false)";
        ClusterFile = 20, "cluster_file", String, true, "Path to the cluster file";
        TraceEnable = 30, "trace_enable", String, false, "Write trace output to the given directory";
        TraceRollSize = 31, "trace_roll_size", Int64, false, "Maximum size in bytes of one trace file (0 for unlimited)";
        TraceMaxLogsSize = 32, "trace_max_logs_size", Int64, false, "Maximum total size in bytes of all trace files (0 for unlimited)";
        TraceLogGroup = 33, "trace_log_group", String, false, "Value of the LogGroup trace attribute";
        TraceFormat = 34, "trace_format", String, false, "Trace file format (xml or json)";
        Knob = 40, "knob", String, false, "Tuning knob as knob_name=knob_value";
        TlsPlugin = 41, "tls_plugin", String, true, "TLS plugin file path or linker-resolved name";
        TlsCertBytes = 42, "tls_cert_bytes", Bytes, false, "Certificate chain";
        TlsCertPath = 43, "tls_cert_path", String, false, "File holding the certificate chain";
        TlsKeyBytes = 45, "tls_key_bytes", Bytes, false, "Private key for the local certificate";
        TlsKeyPath = 46, "tls_key_path", String, false, "File holding the private key";
        TlsVerifyPeers = 47, "tls_verify_peers", Bytes, false, "Peer certificate verification pattern";
        BuggifyEnable = 48, "buggify_enable", None, false, "Not yet implemented by the engine";
        BuggifyDisable = 49, "buggify_disable", None, false, "Not yet implemented by the engine";
        BuggifySectionActivatedProbability = 50, "buggify_section_activated_probability", Int64, false, "Percent chance a fault-injection section is active";
        BuggifySectionFiredProbability = 51, "buggify_section_fired_probability", Int64, false, "Percent chance an active fault-injection section fires";
        TlsCaBytes = 52, "tls_ca_bytes", Bytes, false, "Certificate authority bundle";
        TlsCaPath = 53, "tls_ca_path", String, false, "File holding the certificate authority bundle";
        TlsPassword = 54, "tls_password", String, false, "Passphrase for an encrypted private key";
        DisableMultiVersionClientApi = 60, "disable_multi_version_client_api", None, false, "Use the local client directly";
        CallbacksOnExternalThreads = 61, "callbacks_on_external_threads", None, false, "Allow external client callbacks on library threads";
        ExternalClientLibrary = 62, "external_client_library", String, false, "Add an external client library";
        ExternalClientDirectory = 63, "external_client_directory", String, false, "Add every client library found in a directory";
        DisableLocalClient = 64, "disable_local_client", None, false, "Only connect through external client libraries";
        DisableClientStatisticsLogging = 70, "disable_client_statistics_logging", None, false, "Stop logging sampled client statistics";
        EnableSlowTaskProfiling = 71, "enable_slow_task_profiling", None, false, "Profile slow tasks (requires tracing)";
    }
}

option_table! {
    /// Options applied to a database handle and inherited by its transactions
    DatabaseOption (Database) {
        LocationCacheSize = 10, "location_cache_size", Int64, false, "Maximum location cache entries";
        MaxWatches = 20, "max_watches", Int64, false, "Maximum outstanding watches";
        MachineId = 21, "machine_id", String, false, "Hexadecimal machine ID for locality-aware balancing";
        DatacenterId = 22, "datacenter_id", String, false, "Hexadecimal datacenter ID for locality-aware balancing";
        SnapshotRywEnable = 26, "snapshot_ryw_enable", None, false, "Snapshot reads see the transaction's own writes";
        SnapshotRywDisable = 27, "snapshot_ryw_disable", None, false, "Snapshot reads do not see the transaction's own writes";
        TransactionTimeout = 500, "transaction_timeout", Int64, false, "Default transaction timeout in milliseconds";
        TransactionRetryLimit = 501, "transaction_retry_limit", Int64, false, "Default transaction retry limit";
        TransactionMaxRetryDelay = 502, "transaction_max_retry_delay", Int64, false, "Default maximum retry backoff in milliseconds";
        TransactionSizeLimit = 503, "transaction_size_limit", Int64, false, "Default transaction size limit in bytes";
    }
}

option_table! {
    /// Options applied to a single transaction
    TransactionOption (Transaction) {
        CausalWriteRisky = 10, "causal_write_risky", None, false, "May commit a second time after a fault";
        CausalReadRisky = 20, "causal_read_risky", None, false, "Read version may lag the latest commit";
        CausalReadDisable = 21, "causal_read_disable", None, false, "Not yet implemented by the engine";
        NextWriteNoWriteConflictRange = 30, "next_write_no_write_conflict_range", None, false, "The next write adds no implicit write conflict range";
        ReadYourWritesDisable = 51, "read_your_writes_disable", None, false, "Reads do not see prior writes in the transaction";
        ReadAheadDisable = 52, "read_ahead_disable", None, true, "Disable read-ahead";
        DurabilityDatacenter = 110, "durability_datacenter", None, false, "Not yet implemented by the engine";
        DurabilityRisky = 120, "durability_risky", None, false, "Not yet implemented by the engine";
        DurabilityDevNullIsWebScale = 130, "durability_dev_null_is_web_scale", None, true, "Discard writes";
        PrioritySystemImmediate = 200, "priority_system_immediate", None, false, "Highest priority; other transactions wait";
        PriorityBatch = 201, "priority_batch", None, false, "Low priority, throttled first";
        InitializeNewDatabase = 300, "initialize_new_database", None, false, "Write-only transaction setting the initial configuration";
        AccessSystemKeys = 301, "access_system_keys", None, false, "Read and modify keys starting with 0xFF";
        ReadSystemKeys = 302, "read_system_keys", None, false, "Read keys starting with 0xFF";
        DebugRetryLogging = 401, "debug_retry_logging", String, false, "Not yet implemented by the engine";
        TransactionLoggingEnable = 402, "transaction_logging_enable", String, true, "Identifier used when tracing this transaction";
        DebugTransactionIdentifier = 403, "debug_transaction_identifier", String, false, "Identifier used when tracing or profiling (max 100 characters)";
        LogTransaction = 404, "log_transaction", None, false, "Trace this transaction to the client trace logs";
        Timeout = 500, "timeout", Int64, false, "Timeout in milliseconds (0 disables)";
        RetryLimit = 501, "retry_limit", Int64, false, "Maximum retries (-1 disables the limit)";
        MaxRetryDelay = 502, "max_retry_delay", Int64, false, "Maximum retry backoff in milliseconds";
        SizeLimit = 503, "size_limit", Int64, false, "Transaction size limit in bytes";
        SnapshotRywEnable = 600, "snapshot_ryw_enable", None, false, "Snapshot reads see the transaction's own writes";
        SnapshotRywDisable = 601, "snapshot_ryw_disable", None, false, "Snapshot reads do not see the transaction's own writes";
        LockAware = 700, "lock_aware", None, false, "Read and write locked databases";
        UsedDuringCommitProtectionDisable = 701, "used_during_commit_protection_disable", None, false, "Only the offending operation fails when used during commit";
        ReadLockAware = 702, "read_lock_aware", None, false, "Read locked databases";
        UseProvisionalProxies = 711, "use_provisional_proxies", None, false, "For tools that change the database configuration";
    }
}
