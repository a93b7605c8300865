// src/services/subscription_service.rs
//
// O "portão" de cobrança que protege a criação de imóveis. A flag
// `users.subscription_status` é um cache; a tabela `subscriptions` é a fonte
// da verdade, e o portão conserta o drift entre as duas quando as encontra
// divergentes.

use chrono::{DateTime, Duration, Utc};

use crate::{
    common::error::AppError,
    db::{SubscriptionRepository, UserRepository},
    models::auth::{SubscriptionStatus, User},
};

const TRIAL_DAYS: i64 = 14;

// Fim do trial: 14 dias a partir do cadastro
pub fn trial_end_for(created_at: DateTime<Utc>) -> DateTime<Utc> {
    created_at + Duration::days(TRIAL_DAYS)
}

pub fn trial_active(now: DateTime<Utc>, trial_end: DateTime<Utc>) -> bool {
    now < trial_end
}

#[derive(Clone)]
pub struct SubscriptionService {
    user_repo: UserRepository,
    subscription_repo: SubscriptionRepository,
}

impl SubscriptionService {
    pub fn new(user_repo: UserRepository, subscription_repo: SubscriptionRepository) -> Self {
        Self { user_repo, subscription_repo }
    }

    // Ok(()) se o usuário pode criar imóveis; Err(403) caso contrário.
    pub async fn ensure_active(&self, user: &User) -> Result<(), AppError> {
        match user.subscription_status {
            SubscriptionStatus::Active => Ok(()),

            SubscriptionStatus::Trial => {
                // Calcula (e memoiza) o fim do trial se ainda não houver um.
                // O UPDATE condicional segura a dupla escrita sob concorrência.
                let trial_end = match user.trial_end_date {
                    Some(end) => end,
                    None => {
                        let computed = trial_end_for(user.created_at);
                        self.user_repo.set_trial_end_if_absent(user.id, computed).await?;
                        computed
                    }
                };

                if trial_active(Utc::now(), trial_end) {
                    Ok(())
                } else {
                    self.user_repo
                        .set_subscription_status(user.id, SubscriptionStatus::Suspended)
                        .await?;
                    Err(AppError::forbidden("Trial period has expired"))
                }
            }

            // SUSPENDED/CANCELLED: a flag pode estar desatualizada, então a
            // tabela de assinaturas tem a palavra final.
            _ => {
                if self.subscription_repo.find_active_for_user(user.id).await?.is_some() {
                    // Repara o cache oportunisticamente
                    self.user_repo
                        .set_subscription_status(user.id, SubscriptionStatus::Active)
                        .await?;
                    Ok(())
                } else {
                    Err(AppError::forbidden("An active subscription is required"))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn trial_runs_for_fourteen_days() {
        let signup = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let end = trial_end_for(signup);
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap());
    }

    #[test]
    fn trial_is_active_strictly_before_the_end() {
        let signup = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let end = trial_end_for(signup);
        assert!(trial_active(signup + Duration::days(13), end));
        assert!(!trial_active(end, end));
        assert!(!trial_active(end + Duration::seconds(1), end));
    }
}
