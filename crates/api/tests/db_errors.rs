//! Tests for mapping real constraint violations onto HTTP responses.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use langmap_api::error::AppError;
use langmap_db::models::city::CreateCity;
use langmap_db::models::language::{CreateLanguage, CreateLanguageTranslation};
use langmap_db::repositories::{CityRepo, LanguageRepo, LanguageTranslationRepo};
use sqlx::PgPool;

async fn error_to_response(err: sqlx::Error) -> (StatusCode, serde_json::Value) {
    let response = AppError::Database(err).into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn city(slug: &str) -> CreateCity {
    CreateCity {
        slug: slug.to_string(),
        name: slug.to_uppercase(),
    }
}

fn language(city_id: i64, iso_code: Option<&str>) -> CreateLanguage {
    CreateLanguage {
        city_id,
        endonym: None,
        iso_code: iso_code.map(str::to_string),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_iso_code_returns_400(pool: PgPool) {
    let nyc = CityRepo::create(&pool, &city("nyc")).await.unwrap();

    let err = LanguageRepo::create(&pool, &language(nyc.id, Some("SPANISH")))
        .await
        .unwrap_err();
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "ISO code must be three lowercase letters");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn language_for_missing_city_returns_400(pool: PgPool) {
    let err = LanguageRepo::create(&pool, &language(999_999, None))
        .await
        .unwrap_err();
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Referenced record does not exist"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_name_in_same_locale_returns_409(pool: PgPool) {
    let nyc = CityRepo::create(&pool, &city("nyc")).await.unwrap();
    let spanish = LanguageRepo::create(&pool, &language(nyc.id, None))
        .await
        .unwrap();
    let translation = CreateLanguageTranslation {
        language_id: spanish.id,
        locale: "en".to_string(),
        name: "Spanish".to_string(),
    };
    LanguageTranslationRepo::create(&pool, &translation)
        .await
        .unwrap();

    let err = LanguageTranslationRepo::create(&pool, &translation)
        .await
        .unwrap_err();
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "Language already has a name in this locale");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_city_key_returns_409(pool: PgPool) {
    CityRepo::create(&pool, &city("nyc")).await.unwrap();

    let err = CityRepo::create(&pool, &city("nyc")).await.unwrap_err();
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "A city with this key already exists");
}
