//! # 사용자 리포지토리 구현
//!
//! 사용자 엔티티의 데이터 액세스 계층을 담당하는 리포지토리입니다.
//! MongoDB를 주 저장소로 사용하고, Redis를 통한 캐싱을 지원합니다.
//!
//! ## 특징
//!
//! - **하이브리드 스토리지**: MongoDB + Redis 캐싱
//! - **자동 의존성 주입**: 싱글톤 매크로를 통한 DI
//! - **데이터 무결성**: 유니크 제약 조건 및 인덱스 관리

use std::sync::Arc;
use mongodb::{bson::{doc, oid::ObjectId}, options::IndexOptions, IndexModel};
use crate::{
    caching::redis::RedisClient,
    core::errors::AppError,
    core::registry::Repository,
    db::Database,
    domain::entities::users::user::User,
};
use singleton_macro::repository;

/// 사용자 데이터 액세스 리포지토리
///
/// 사용자 엔티티의 CRUD 연산을 담당하며, MongoDB 컬렉션과
/// Redis 캐시를 통합하여 최적화된 데이터 액세스를 제공합니다.
///
/// ## 캐싱 전략
///
/// ### L1 Cache (Redis)
/// - **TTL**: 10분 (600초)
/// - **키 패턴**:
///   - 개별 사용자: `user:{user_id}`
///   - 이메일 조회: `user:email:{email}`
///
/// ### L2 Storage (MongoDB)
/// - **컬렉션명**: `users`
/// - **인덱스**: email(unique), username(unique), created_at(desc)
#[repository(name = "user", collection = "users")]
pub struct UserRepository {
    /// MongoDB 데이터베이스 연결 (자동 주입)
    db: Arc<Database>,

    /// Redis 캐시 클라이언트 (자동 주입)
    redis: Arc<RedisClient>,
}

impl UserRepository {
    /// 이메일 주소로 사용자 조회
    ///
    /// 캐시 우선 조회를 통해 성능을 최적화합니다.
    ///
    /// # 캐싱 정책
    ///
    /// - **캐시 키**: `user:email:{email}`
    /// - **TTL**: 600초 (10분)
    /// - **캐시 미스**: MongoDB에서 조회 후 캐시에 저장
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        // 캐시에서 먼저 확인
        let cache_key = format!("user:email:{}", email);

        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        // DB 에서 조회
        let user = self.collection::<User>()
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        // 캐시에 저장 (10분)
        if let Some(ref user) = user {
            let _ = self.redis
                .set_with_expiry(&cache_key, user, 600)
                .await;
        }

        Ok(user)
    }

    /// 사용자명으로 사용자 조회
    ///
    /// 사용자명은 시스템 전체에서 유니크하므로 최대 1개의 결과만 반환됩니다.
    /// 조회 빈도가 낮아 캐싱하지 않습니다.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        self.collection::<User>()
            .find_one(doc! { "username": username })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// ID로 사용자 조회
    ///
    /// 가장 빈번한 조회 패턴이므로 적극적인 캐싱을 적용합니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(Some(User))` - 사용자를 찾은 경우
    /// * `Ok(None)` - 해당 ID의 사용자가 없는 경우
    /// * `Err(AppError::ValidationError)` - 잘못된 ObjectId 형식
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        let cache_key = self.cache_key(id);

        // 캐시 확인
        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        // DB 조회
        let user = self.collection::<User>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        // 캐시 저장
        if let Some(ref user) = user {
            let _ = self.redis
                .set_with_expiry(&cache_key, user, 600)
                .await;
        }

        Ok(user)
    }

    /// 새 사용자 생성
    ///
    /// 이메일과 사용자명의 중복 여부를 사전에 검증하고,
    /// 성공 시 관련 캐시를 무효화합니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(User)` - 생성된 사용자 (ID 포함)
    /// * `Err(AppError::ConflictError)` - 이메일 또는 사용자명 중복
    pub async fn create(&self, mut user: User) -> Result<User, AppError> {
        // 중복 확인
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::ConflictError("이미 사용 중인 이메일입니다".to_string()));
        }

        if self.find_by_username(&user.username).await?.is_some() {
            return Err(AppError::ConflictError("이미 사용 중인 사용자명입니다".to_string()));
        }

        // DB에 저장
        let result = self.collection::<User>()
            .insert_one(&user)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        user.id = result.inserted_id.as_object_id();

        // 컬렉션 캐시 무효화
        let _ = self.invalidate_collection_cache(None).await;

        Ok(user)
    }

    /// 사용자 정보 업데이트
    ///
    /// MongoDB `$set` 연산자로 지정된 필드만 변경하며,
    /// find_one_and_update로 조회와 업데이트를 원자적으로 수행합니다.
    /// 업데이트 후 해당 사용자의 캐시를 무효화합니다.
    pub async fn update(&self, id: &str, update_doc: mongodb::bson::Document) -> Result<Option<User>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        let options = mongodb::options::FindOneAndUpdateOptions::builder()
            .return_document(mongodb::options::ReturnDocument::After)
            .build();

        let updated_user = self.collection::<User>()
            .find_one_and_update(
                doc! { "_id": object_id },
                doc! { "$set": update_doc },
            )
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        // 캐시 무효화
        if let Some(ref user) = updated_user {
            let _ = self.invalidate_cache(id).await;
            let _ = self.redis.del(&format!("user:email:{}", user.email)).await;
        }

        Ok(updated_user)
    }

    /// 사용자 삭제
    ///
    /// 지정된 ID의 사용자를 데이터베이스에서 영구적으로 삭제합니다.
    /// 삭제 성공 시 관련된 캐시를 무효화합니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(true)` - 사용자가 성공적으로 삭제됨
    /// * `Ok(false)` - 해당 ID의 사용자가 존재하지 않음
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        // 이메일 캐시 무효화를 위해 삭제 전에 조회
        let existing = self.find_by_id(id).await?;

        let result = self.collection::<User>()
            .delete_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if result.deleted_count > 0 {
            // 캐시 무효화
            let _ = self.invalidate_cache(id).await;
            let _ = self.invalidate_collection_cache(None).await;
            if let Some(user) = existing {
                let _ = self.redis.del(&format!("user:email:{}", user.email)).await;
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// 데이터베이스 인덱스 생성
    ///
    /// 사용자 컬렉션에 필요한 모든 인덱스를 생성합니다.
    /// 애플리케이션 초기화 시점에 한 번 실행하여 쿼리 성능을 최적화합니다.
    ///
    /// # 생성되는 인덱스
    ///
    /// 1. `email_unique` - 중복 이메일 방지 및 이메일 조회 최적화
    /// 2. `username_unique` - 중복 사용자명 방지
    /// 3. `created_at_desc` - 최근 사용자 조회 및 정렬 최적화
    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let collection = self.collection::<User>();

        // 이메일 유니크 인덱스
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build())
            .build();

        // 사용자명 유니크 인덱스
        let username_index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("username_unique".to_string())
                .build())
            .build();

        // 생성일 인덱스
        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(IndexOptions::builder()
                .name("created_at_desc".to_string())
                .build())
            .build();

        collection
            .create_indexes([email_index, username_index, created_at_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
