use uuid::Uuid;

use crate::errors::AppError;

/// Parses a path identifier, reporting a malformed one as a bad `id`.
pub fn valid_uuid(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim()).map_err(|_| AppError::InvalidFormat("id".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hyphenated_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(valid_uuid(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn malformed_id_names_the_field() {
        let err = valid_uuid("65f1c0ffee").unwrap_err();
        assert_eq!(err.to_string(), "Invalid data format for id");
    }
}
