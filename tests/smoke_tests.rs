//! Smoke tests against a file-backed database, covering restart behavior.

use loandesk::config::Config;
use loandesk::domain::{Caller, LoanDuration, LoanStatus, PaymentMethod, Role};
use loandesk::models::{BorrowerDetails, LoanFilter, LoanLimits, LoanRequest};
use loandesk::services::{LoanQuery, LoanSubmission};
use loandesk::state::SharedState;

fn file_config(db_path: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config
}

fn submission(amount: f64) -> LoanSubmission {
    LoanSubmission {
        borrower: BorrowerDetails {
            full_name: "Shirin Sultana".to_string(),
            date_of_birth: "1990-08-30".to_string(),
            phone_number: "01655555555".to_string(),
            address: "Agrabad, Chattogram".to_string(),
            national_id_number: "1990765432109".to_string(),
            nid_front_url: "front.png".to_string(),
            nid_back_url: "back.png".to_string(),
            salary_amount: 60_000.0,
            job_type: "Business".to_string(),
            bank_account_number: "0987654321".to_string(),
            emergency_contact_name: "Kamal Uddin".to_string(),
            emergency_contact_phone: "01566666666".to_string(),
        },
        request: LoanRequest {
            loan_amount: amount,
            loan_duration: LoanDuration::SixMonths,
            downpayment_method: PaymentMethod::Rocket,
            downpayment_screenshot_url: "rocket.png".to_string(),
        },
    }
}

#[tokio::test]
async fn test_state_survives_restart() {
    let db_path =
        std::env::temp_dir().join(format!("loandesk-smoke-test-{}.db", uuid::Uuid::new_v4()));
    let config = file_config(&db_path);

    let (loan_id, owner) = {
        let state = SharedState::new(config.clone())
            .await
            .expect("failed to create state");
        state.store.ping().await.expect("database not reachable");

        let owner = state
            .store
            .get_user_by_email("user@example.com")
            .await
            .unwrap()
            .expect("seed user missing")
            .caller();
        let super_admin = state
            .store
            .get_user_by_email("super@example.com")
            .await
            .unwrap()
            .expect("seed super admin missing")
            .caller();

        state
            .settings_service
            .set_limits(
                &super_admin,
                LoanLimits {
                    min: 2000.0,
                    max: 80_000.0,
                },
            )
            .await
            .unwrap();

        let loan = state
            .loan_service
            .submit(&owner, submission(40_000.0))
            .await
            .unwrap();
        assert_eq!(loan.status, LoanStatus::Pending);

        (loan.id, owner)
    };

    // Reopen: seeding must not duplicate accounts and data must persist
    let state = SharedState::new(config).await.expect("failed to reopen state");

    let users = state.store.list_users().await.unwrap();
    assert_eq!(users.len(), 3);

    let settings = state.settings_service.current().await.unwrap();
    assert_eq!(settings.limits.min, 2000.0);
    assert_eq!(settings.limits.max, 80_000.0);

    let loans = state
        .loan_service
        .list(&owner, LoanQuery::default())
        .await
        .unwrap();
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].id, loan_id);
    assert_eq!(loans[0].terms().total_repayment(), 47_200.0);
    assert_eq!(loans[0].terms().emi_amount(), 7866.67);

    let admin = Caller::new(0, Role::Admin);
    let all = state.store.list_loans(LoanFilter::default()).await.unwrap();
    assert_eq!(all.len(), 1);
    let approved = state
        .loan_service
        .set_status(&admin, loan_id, LoanStatus::Approved)
        .await
        .unwrap();
    assert!(approved.status_changed_at.is_some());
    assert_eq!(approved.terms().emi_amount(), 7866.67);

    let _ = std::fs::remove_file(&db_path);
}
