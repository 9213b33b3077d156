mod common;

use palpitoo::db::league_repo::{self, INVITE_CODE_ATTEMPTS};
use palpitoo::errors::AppError;

fn fresh_code() -> String {
    common::unique("c").to_uppercase()
}

#[tokio::test]
async fn test_invite_code_collision_draws_a_new_code() {
    let pool = common::setup_test_db().await;
    let owner = common::seed_user(&pool, "owner").await;
    let taken = fresh_code();

    let first = league_repo::create_league(&pool, owner.id, "Primeira", || taken.clone())
        .await
        .unwrap();
    assert_eq!(first.invite_code, taken);

    let replacement = fresh_code();
    let mut codes = vec![replacement.clone(), taken.clone()];
    let second = league_repo::create_league(&pool, owner.id, "Segunda", || codes.pop().unwrap())
        .await
        .unwrap();
    assert_eq!(second.invite_code, replacement);

    // Owner is enrolled even after a retry.
    let members = league_repo::get_members(&pool, second.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id, owner.id);
}

#[tokio::test]
async fn test_invite_code_retries_are_bounded() {
    let pool = common::setup_test_db().await;
    let owner = common::seed_user(&pool, "owner").await;
    let taken = fresh_code();
    league_repo::create_league(&pool, owner.id, "Original", || taken.clone())
        .await
        .unwrap();

    let mut tries = 0;
    let err = league_repo::create_league(&pool, owner.id, "Copia", || {
        tries += 1;
        taken.clone()
    })
    .await
    .unwrap_err();

    assert_eq!(tries, INVITE_CODE_ATTEMPTS);
    assert!(matches!(AppError::from(err), AppError::Conflict(_)));
}
