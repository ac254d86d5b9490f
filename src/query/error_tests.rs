//! Unit tests for query error types

#[cfg(test)]
mod tests {
    use crate::query::error::QueryError;
    use crate::segments::SegmentError;
    use std::error::Error;

    #[test]
    fn test_unknown_index_display() {
        let error = QueryError::UnknownIndex("barcode".to_string());
        assert_eq!(error.to_string(), "Unknown search index 'barcode'");
    }

    #[test]
    fn test_segment_error_conversion() {
        let error: QueryError = SegmentError::UnknownSegment("authorities".to_string()).into();

        assert!(error.to_string().contains("Segment error"));
        assert!(error.to_string().contains("authorities"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_unknown_index_has_no_source() {
        let error = QueryError::UnknownIndex("x".to_string());
        assert!(error.source().is_none());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QueryError>();
    }
}
