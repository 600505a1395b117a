use crate::config::SecurityConfig;
use crate::domain::User;
use crate::dto::{UserRequestDto, UserResponseDto};
use crate::error::{MarketError, Result};
use crate::repository::UserRepository;
use crate::security::{Authority, PasswordEncoder, TokenStore, UserAuthentication};
use puppymarket_macro::Injectable;
use std::sync::Arc;
use validator::Validate;

#[derive(Injectable)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    password_encoder: Arc<PasswordEncoder>,
    tokens: Arc<TokenStore>,
    security: Arc<SecurityConfig>,
}

impl UserService {
    pub async fn get_user(&self, id: i64) -> Result<UserResponseDto> {
        self.users
            .find_by_id(id)
            .await?
            .map(UserResponseDto::from)
            .ok_or_else(|| MarketError::not_found("User", id))
    }

    /// Register a member and return a bearer token for them
    pub async fn join(&self, dto: UserRequestDto) -> Result<String> {
        dto.validate()?;
        let email = dto.email.trim().to_string();

        // Early exit only; `insert` enforces uniqueness
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(MarketError::Conflict(format!("email {email} is already registered")));
        }
        let password = self.password_encoder.encode_blocking(dto.password).await?;

        let user = self
            .users
            .insert(User {
                id: 0,
                email,
                password,
                nickname: dto.nickname,
                bit_category: dto.bit_category,
                image_path: dto.image_path,
                tel: dto.tel,
                si: dto.si,
                gu: dto.gu,
            })
            .await?;

        let mut authorities = vec![Authority::User];
        if self.security.is_admin_email(&user.email) {
            authorities.push(Authority::Admin);
        }
        tracing::info!(user_id = user.id, ?authorities, "member joined");

        Ok(self
            .tokens
            .issue(UserAuthentication::new(user.id, user.email, authorities)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{Database, InMemoryUserRepository};
    use crate::{Container, Injectable};

    fn service(admin_emails: &[&str]) -> (UserService, Arc<TokenStore>) {
        let mut container = Container::new();
        container.register(Database::new());
        container.register(PasswordEncoder);
        container.register(TokenStore::new());
        container.register(SecurityConfig {
            admin_emails: admin_emails.iter().map(|e| e.to_string()).collect(),
        });
        let users = InMemoryUserRepository::inject(&container).unwrap();
        container.register(users);
        container.register_trait::<dyn UserRepository, InMemoryUserRepository, _>(|i| i as Arc<dyn UserRepository>);
        let tokens = container.resolve::<TokenStore>().unwrap();
        (UserService::inject(&container).unwrap(), tokens)
    }

    fn request(email: &str) -> UserRequestDto {
        UserRequestDto {
            email: email.into(),
            password: "correct horse".into(),
            nickname: "bori".into(),
            bit_category: 0,
            image_path: None,
            tel: None,
            si: Some("서울시".into()),
            gu: Some("마포구".into()),
        }
    }

    #[tokio::test]
    async fn join_issues_a_user_token_and_hashes_the_password() {
        let (service, tokens) = service(&[]);
        let token = service.join(request("bori@puppy.market")).await.unwrap();

        let auth = tokens.authenticate(&token).unwrap();
        assert_eq!(auth.user_id, 1);
        assert!(auth.has_authority(Authority::User));
        assert!(!auth.is_admin());

        let stored = service.users.find_by_id(1).await.unwrap().unwrap();
        assert_ne!(stored.password, "correct horse");
        assert!(PasswordEncoder.matches("correct horse", &stored.password));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict_regardless_of_case() {
        let (service, _) = service(&[]);
        service.join(request("bori@puppy.market")).await.unwrap();
        let err = service.join(request("BORI@puppy.market")).await.unwrap_err();
        assert!(matches!(err, MarketError::Conflict(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_joins_with_one_email_register_once() {
        let (service, _) = service(&[]);
        let service = Arc::new(service);
        let tasks: Vec<_> = ["dup@puppy.market", "DUP@puppy.market", "Dup@Puppy.Market", "dup@PUPPY.market"]
            .into_iter()
            .map(|email| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.join(request(email)).await })
            })
            .collect();

        let mut joined = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => joined += 1,
                Err(MarketError::Conflict(_)) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(joined, 1);
        assert!(service.users.find_by_email("dup@puppy.market").await.unwrap().is_some());
        assert!(service.users.find_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn configured_admin_emails_get_admin() {
        let (service, tokens) = service(&["ops@puppy.market"]);
        let token = service.join(request("Ops@Puppy.Market")).await.unwrap();
        assert!(tokens.authenticate(&token).unwrap().is_admin());
    }

    #[tokio::test]
    async fn invalid_registration_is_rejected_before_saving() {
        let (service, _) = service(&[]);
        let mut dto = request("bori@puppy.market");
        dto.password = "short".into();
        assert!(matches!(service.join(dto).await, Err(MarketError::Validation(_))));
        assert!(service.users.find_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (service, _) = service(&[]);
        assert!(matches!(
            service.get_user(42).await,
            Err(MarketError::NotFound { resource: "User", id: 42 })
        ));
    }
}
