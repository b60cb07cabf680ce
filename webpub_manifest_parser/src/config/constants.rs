pub mod compile_time {
    pub mod document {
        /// Maximum manifest size accepted from a file or reader (10MB)
        /// SECURITY: Bounds the memory a single parse can allocate
        pub const MAX_DOCUMENT_SIZE: u64 = 10 * 1024 * 1024;

        /// Threshold for considering a manifest "large" (1MB)
        /// PERFORMANCE: Large manifests are reported in the load log
        pub const LARGE_DOCUMENT_THRESHOLD: u64 = 1024 * 1024;

        /// Encoding assumed when the caller does not name one
        pub const DEFAULT_ENCODING: &str = "utf-8";
    }

    pub mod syntax {
        /// Maximum depth of nested nodes (links inside links, collections inside collections)
        /// SECURITY: Prevents stack exhaustion from deeply nested `alternate`/`children` chains
        pub const MAX_NESTING_DEPTH: usize = 64;

        /// Maximum number of syntax errors recorded per document
        /// RESOURCE: Bounds the error list for hostile documents
        pub const MAX_SYNTAX_ERRORS: usize = 1_000;
    }

    pub mod semantic {
        /// Maximum number of semantic errors recorded per document
        /// RESOURCE: Bounds the error list for hostile documents
        pub const MAX_SEMANTIC_ERRORS: usize = 1_000;

        /// Maximum error message length, longer messages are truncated
        /// RESOURCE: Attacker-controlled hrefs and titles end up in messages
        pub const MAX_ERROR_MESSAGE_LENGTH: usize = 1_024;
    }

    pub mod logging {
        /// Maximum events retained by the in-memory logger
        pub const LOG_BUFFER_SIZE: usize = 10_000;

        /// Maximum log message length
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 4_096;
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time::*;

    #[test]
    fn test_limits_are_consistent() {
        assert!(document::LARGE_DOCUMENT_THRESHOLD <= document::MAX_DOCUMENT_SIZE);
        assert!(syntax::MAX_NESTING_DEPTH >= 8);
        assert!(semantic::MAX_ERROR_MESSAGE_LENGTH <= logging::MAX_LOG_MESSAGE_LENGTH);
        assert!(logging::LOG_BUFFER_SIZE >= 100);
    }
}
