//! Integration tests for the language, translation and taxonomy repositories.
//!
//! Exercises the repository layer against a real database:
//! - Name lookup scoped by city and locale
//! - Cascade delete from languages to translations and assignments
//! - Unique (language, locale) translation constraint
//! - Taxonomy assignment replacement

use sqlx::PgPool;
use langmap_db::models::city::CreateCity;
use langmap_db::models::language::{CreateLanguage, CreateLanguageTranslation, UpdateLanguage};
use langmap_db::models::taxonomy::{CreateTaxonomyCategory, CreateTaxonomyValue};
use langmap_db::repositories::{
    CityRepo, LanguageRepo, LanguageTaxonomyRepo, LanguageTranslationRepo, TaxonomyRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_city(pool: &PgPool, slug: &str) -> i64 {
    CityRepo::create(
        pool,
        &CreateCity {
            slug: slug.to_string(),
            name: slug.to_uppercase(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_language(pool: &PgPool, city_id: i64, locale: &str, name: &str) -> i64 {
    let language = LanguageRepo::create(
        pool,
        &CreateLanguage {
            city_id,
            endonym: None,
            iso_code: None,
        },
    )
    .await
    .unwrap();
    LanguageTranslationRepo::create(
        pool,
        &CreateLanguageTranslation {
            language_id: language.id,
            locale: locale.to_string(),
            name: name.to_string(),
        },
    )
    .await
    .unwrap();
    language.id
}

async fn seed_values(pool: &PgPool, city_id: i64, slugs: &[&str]) -> Vec<i64> {
    let category = TaxonomyRepo::create_category(
        pool,
        &CreateTaxonomyCategory {
            city_id,
            slug: "region".to_string(),
            name: "Region".to_string(),
        },
    )
    .await
    .unwrap();

    let mut ids = Vec::new();
    for slug in slugs {
        let value = TaxonomyRepo::create_value(
            pool,
            &CreateTaxonomyValue {
                category_id: category.id,
                slug: slug.to_string(),
                name: slug.to_string(),
            },
        )
        .await
        .unwrap();
        ids.push(value.id);
    }
    ids
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_city_lookup_by_slug(pool: PgPool) {
    let id = seed_city(&pool, "nyc").await;

    let found = CityRepo::find_by_slug(&pool, "nyc").await.unwrap().unwrap();
    assert_eq!(found.id, id);
    assert!(CityRepo::find_by_slug(&pool, "atlantis").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_city_slug_rejected(pool: PgPool) {
    seed_city(&pool, "nyc").await;
    let err = CityRepo::create(
        &pool,
        &CreateCity {
            slug: "nyc".to_string(),
            name: "Again".to_string(),
        },
    )
    .await
    .unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.constraint(), Some("uq_cities_slug"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_translation_name_scoped_to_city_and_locale(pool: PgPool) {
    let nyc = seed_city(&pool, "nyc").await;
    let berlin = seed_city(&pool, "berlin").await;
    let id = seed_language(&pool, nyc, "en", "Spanish").await;
    seed_language(&pool, berlin, "en", "Spanish").await;

    let found = LanguageRepo::find_by_translation_name(&pool, nyc, "en", "Spanish")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, id);

    assert!(LanguageRepo::find_by_translation_name(&pool, nyc, "es", "Spanish")
        .await
        .unwrap()
        .is_none());
    assert!(LanguageRepo::find_by_translation_name(&pool, nyc, "en", "spanish")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_overwrites_metadata(pool: PgPool) {
    let city = seed_city(&pool, "nyc").await;
    let language = LanguageRepo::create(
        &pool,
        &CreateLanguage {
            city_id: city,
            endonym: Some("Español".to_string()),
            iso_code: Some("spa".to_string()),
        },
    )
    .await
    .unwrap();

    let updated = LanguageRepo::update(
        &pool,
        language.id,
        &UpdateLanguage {
            endonym: None,
            iso_code: Some("cat".to_string()),
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.endonym, None);
    assert_eq!(updated.iso_code.as_deref(), Some("cat"));
    assert!(updated.updated_at >= language.updated_at);

    assert!(LanguageRepo::update(
        &pool,
        999_999,
        &UpdateLanguage {
            endonym: None,
            iso_code: None,
        },
    )
    .await
    .unwrap()
    .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_iso_code_rejected_by_check(pool: PgPool) {
    let city = seed_city(&pool, "nyc").await;
    let result = LanguageRepo::create(
        &pool,
        &CreateLanguage {
            city_id: city,
            endonym: None,
            iso_code: Some("SPA".to_string()),
        },
    )
    .await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_translation_unique_per_locale(pool: PgPool) {
    let city = seed_city(&pool, "nyc").await;
    let id = seed_language(&pool, city, "en", "Spanish").await;

    let err = LanguageTranslationRepo::create(
        &pool,
        &CreateLanguageTranslation {
            language_id: id,
            locale: "en".to_string(),
            name: "Castilian".to_string(),
        },
    )
    .await
    .unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }

    LanguageTranslationRepo::create(
        &pool,
        &CreateLanguageTranslation {
            language_id: id,
            locale: "es".to_string(),
            name: "Español".to_string(),
        },
    )
    .await
    .unwrap();

    let all = LanguageTranslationRepo::list_for_language(&pool, id).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_name(pool: PgPool) {
    let city = seed_city(&pool, "nyc").await;
    let id = seed_language(&pool, city, "en", "Spanish").await;

    assert!(LanguageTranslationRepo::update_name(&pool, id, "en", "Castilian")
        .await
        .unwrap());
    assert!(!LanguageTranslationRepo::update_name(&pool, id, "fr", "Espagnol")
        .await
        .unwrap());

    let translation = LanguageTranslationRepo::find(&pool, id, "en")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(translation.name, "Castilian");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascades(pool: PgPool) {
    let city = seed_city(&pool, "nyc").await;
    let id = seed_language(&pool, city, "en", "Spanish").await;
    let values = seed_values(&pool, city, &["caribbean"]).await;
    LanguageTaxonomyRepo::batch_insert(&pool, id, &values).await.unwrap();

    assert!(LanguageRepo::delete(&pool, id).await.unwrap());
    assert!(!LanguageRepo::delete(&pool, id).await.unwrap());

    assert!(LanguageTranslationRepo::find(&pool, id, "en").await.unwrap().is_none());
    assert!(LanguageTaxonomyRepo::list_value_ids(&pool, id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_taxonomy_replace(pool: PgPool) {
    let city = seed_city(&pool, "nyc").await;
    let id = seed_language(&pool, city, "en", "Spanish").await;
    let values = seed_values(&pool, city, &["caribbean", "andes", "iberia"]).await;

    assert_eq!(
        LanguageTaxonomyRepo::batch_insert(&pool, id, &values[..2]).await.unwrap(),
        2
    );
    assert_eq!(LanguageTaxonomyRepo::delete_for_language(&pool, id).await.unwrap(), 2);
    assert_eq!(
        LanguageTaxonomyRepo::batch_insert(&pool, id, &values[2..]).await.unwrap(),
        1
    );
    assert_eq!(LanguageTaxonomyRepo::batch_insert(&pool, id, &[]).await.unwrap(), 0);

    let assigned = LanguageTaxonomyRepo::list_value_ids(&pool, id).await.unwrap();
    assert_eq!(assigned, vec![values[2]]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_for_city_uses_locale(pool: PgPool) {
    let city = seed_city(&pool, "nyc").await;
    seed_language(&pool, city, "en", "Yiddish").await;
    seed_language(&pool, city, "en", "Bengali").await;
    seed_language(&pool, city, "es", "Quechua").await;

    let listed = LanguageRepo::list_for_city(&pool, city, "en").await.unwrap();
    let names: Vec<&str> = listed.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Bengali", "Yiddish"]);
    assert_eq!(LanguageRepo::count_for_city(&pool, city).await.unwrap(), 3);
}
