#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::error::AppError;
    use crate::service::{CharacterService, NAME_MAX};
    use crate::store::MemoryCharacterStore;
    use crate::types::{CharacterFilter, CharacterPayload, CharacterStatus};

    fn service() -> CharacterService {
        CharacterService::new(Arc::new(MemoryCharacterStore::new()))
    }

    fn payload(name: &str) -> CharacterPayload {
        CharacterPayload { name: Some(name.to_string()), ..Default::default() }
    }

    #[test]
    fn test_validate_collects_all_violations() {
        let bad = CharacterPayload {
            name: None,
            origin: Some("o".repeat(151)),
            powers: Some("p".repeat(501)),
            image_url: Some("u".repeat(501)),
            ..Default::default()
        };
        match bad.validate() {
            Err(AppError::Validation { errors }) => {
                let keys: Vec<&str> = errors.keys().map(String::as_str).collect();
                assert_eq!(keys, vec!["imageUrl", "name", "origin", "powers"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_counts_characters_not_bytes() {
        let name = "é".repeat(NAME_MAX);
        assert!(payload(&name).validate().is_ok());
        assert!(payload(&format!("{}é", name)).validate().is_err());
    }

    #[test]
    fn test_validate_defaults_status_to_active() {
        let fields = payload("Raven").validate().unwrap();
        assert_eq!(fields.status, CharacterStatus::Active);
    }

    #[tokio::test]
    async fn test_missing_records_are_not_found() {
        let svc = service();

        assert!(matches!(svc.get(1).await, Err(AppError::NotFound(_))));
        assert!(matches!(svc.update(1, payload("X")).await, Err(AppError::NotFound(_))));
        assert!(matches!(svc.delete(1).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_invalid_update_leaves_record_untouched() {
        let svc = service();
        let created = svc.create(payload("Starfire")).await.unwrap();

        let result = svc.update(created.id, payload("")).await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
        assert_eq!(svc.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_filter_with_blank_criteria_lists_everything() {
        let svc = service();
        svc.create(payload("Beast Boy")).await.unwrap();
        svc.create(payload("Robin")).await.unwrap();

        let filter = CharacterFilter {
            name: Some("  ".to_string()),
            affiliation: Some(String::new()),
            status: None,
        };
        assert_eq!(svc.filter(filter).await.unwrap().len(), 2);

        let filter = CharacterFilter { name: Some("rob".to_string()), ..Default::default() };
        let found = svc.filter(filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Robin");
    }

    #[tokio::test]
    async fn test_search_helpers() {
        let svc = service();
        let mut raven = payload("Raven");
        raven.real_name = Some("Rachel Roth".to_string());
        raven.origin = Some("Azarath".to_string());
        raven.affiliation = Some("Teen Titans".to_string());
        raven.status = Some(CharacterStatus::Inactive);
        svc.create(raven).await.unwrap();
        svc.create(payload("Ravager")).await.unwrap();

        assert_eq!(svc.search_by_name("rav").await.unwrap().len(), 2);
        assert_eq!(svc.search_by_real_name("ROTH").await.unwrap().len(), 1);
        assert_eq!(svc.search_by_origin("zar").await.unwrap().len(), 1);
        assert_eq!(svc.search_by_affiliation("Teen Titans").await.unwrap().len(), 1);
        assert_eq!(svc.search_by_status(CharacterStatus::Active).await.unwrap().len(), 1);
        assert!(svc.exists_by_name("raven").await.unwrap());
        assert_eq!(svc.count().await.unwrap(), 2);
    }
}
