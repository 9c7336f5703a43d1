use crate::db::DbConnection;
use crate::error::AppError;
use shared::{InsertResponseResult, ResponseRecord};
use tracing::info;

/// Allowed distance from 1 for the sum of the stored shares.
///
/// Shares arrive rounded to six digits, so their sum can drift by a few ulps
/// of 1e-6.
const SUM_TOLERANCE: f64 = 1e-4;

#[derive(Clone)]
pub struct ResponseService {
    db: DbConnection,
}

impl ResponseService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Validate and persist a response, returning its generated id
    pub async fn record_response(&self, record: ResponseRecord) -> Result<InsertResponseResult, AppError> {
        validate_record(&record)?;

        let id = uuid::Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().to_rfc3339();
        self.db.insert_response(&id, &record, &created_at).await?;

        info!(
            "Stored response {} for {}: innovation={} equality={} stability={}",
            id, record.period, record.innovation, record.equality, record.stability
        );
        Ok(InsertResponseResult { id })
    }
}

pub fn validate_record(record: &ResponseRecord) -> Result<(), AppError> {
    if record.period.trim().is_empty() {
        return Err(AppError::InvalidResponse("period must not be empty".to_string()));
    }

    let shares = [
        ("innovation", record.innovation),
        ("equality", record.equality),
        ("stability", record.stability),
    ];
    for (name, value) in shares {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(AppError::InvalidResponse(format!(
                "{} must be between 0 and 1, got {}",
                name, value
            )));
        }
    }

    let sum = record.innovation + record.equality + record.stability;
    if (sum - 1.0).abs() > SUM_TOLERANCE {
        return Err(AppError::InvalidResponse(format!(
            "proportions must sum to 1, got {}",
            sum
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(innovation: f64, equality: f64, stability: f64) -> ResponseRecord {
        ResponseRecord {
            period: "2025".to_string(),
            innovation,
            equality,
            stability,
        }
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(validate_record(&record(0.3, 0.3, 0.4)).is_ok());
        assert!(validate_record(&record(0.333333, 0.333333, 0.333333)).is_ok());
        assert!(validate_record(&record(0.0, 0.0, 1.0)).is_ok());
    }

    #[test]
    fn test_negative_share_is_rejected() {
        let err = validate_record(&record(-0.1, 0.6, 0.5)).unwrap_err();
        assert!(matches!(err, AppError::InvalidResponse(_)));
        assert!(err.to_string().contains("innovation"));
    }

    #[test]
    fn test_non_finite_share_is_rejected() {
        assert!(validate_record(&record(f64::NAN, 0.5, 0.5)).is_err());
    }

    #[test]
    fn test_bad_sum_is_rejected() {
        let err = validate_record(&record(0.5, 0.5, 0.5)).unwrap_err();
        assert!(err.to_string().contains("sum to 1"));
    }

    #[test]
    fn test_empty_period_is_rejected() {
        let mut r = record(0.3, 0.3, 0.4);
        r.period = "  ".to_string();
        assert!(validate_record(&r).is_err());
    }

    #[tokio::test]
    async fn test_record_response_persists() {
        let db = DbConnection::init_test().await.unwrap();
        let service = ResponseService::new(db.clone());

        let result = service.record_response(record(0.3, 0.3, 0.4)).await.unwrap();
        let stored = db.get_response(&result.id).await.unwrap().unwrap();
        assert_eq!(stored.record, record(0.3, 0.3, 0.4));
    }

    #[tokio::test]
    async fn test_invalid_response_is_not_persisted() {
        let db = DbConnection::init_test().await.unwrap();
        let service = ResponseService::new(db.clone());

        assert!(service.record_response(record(0.9, 0.9, 0.9)).await.is_err());
        assert_eq!(db.count_responses("2025").await.unwrap(), 0);
    }
}
