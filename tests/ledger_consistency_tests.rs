//! Consistency tests between cases and balance summaries

#[cfg(test)]
mod tests {
    use sqlx::PgPool;
    use uuid::Uuid;

    use recoveryhub_backend::balances::BalanceService;
    use recoveryhub_backend::cases::{
        CaseChanges, CaseService, CaseStatus, CreateCaseRequest, ListCasesQuery,
    };
    use recoveryhub_backend::submissions::{
        CreateSubmissionRequest, SubmissionService, SubmissionStatus, UpdateSubmissionRequest,
    };

    /// Helper to create a test database pool
    async fn setup_test_db() -> PgPool {
        let database_url = std::env::var("TEST_DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/recoveryhub_test".to_string());

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(1)
            .connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    /// Helper to seed a registered user and return its ID
    async fn seed_user(pool: &PgPool, email: &str) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO users (id, email, name) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(email)
            .bind("Test User")
            .execute(pool)
            .await
            .expect("Failed to seed user");
        id
    }

    fn case_service(pool: &PgPool) -> CaseService {
        CaseService::new(pool.clone(), "RC".to_string(), 5)
    }

    fn create_test_request() -> CreateCaseRequest {
        CreateCaseRequest {
            title: "Fake investment platform".to_string(),
            description: "Deposited funds into a platform that blocked withdrawals".to_string(),
            scam_category: "Investment Fraud".to_string(),
            amount: "2500.00".to_string(),
            evidence: Some("https://example.com/statement.pdf".to_string()),
        }
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_case_creation_updates_summary_atomically() {
        let pool = setup_test_db().await;
        let user_id = seed_user(&pool, &format!("{}@example.com", Uuid::new_v4())).await;

        let service = case_service(&pool);
        let balance_service = BalanceService::new(pool.clone());

        let case = service
            .create_case(user_id, create_test_request())
            .await
            .expect("Case creation should succeed");

        assert_eq!(case.status, CaseStatus::Pending);
        assert_eq!(case.amount_cents, 250_000);
        assert!(case.case_number.starts_with("RC-"));

        let summary = balance_service
            .get_for_user(user_id)
            .await
            .expect("Summary fetch should succeed");

        assert_eq!(summary.amount_lost_cents, 250_000);
        assert_eq!(summary.total_cases, 1);
        assert_eq!(summary.pending_cases, 1);
        assert_eq!(summary.completed_cases, 0);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_admin_update_recomputes_summary() {
        let pool = setup_test_db().await;
        let user_id = seed_user(&pool, &format!("{}@example.com", Uuid::new_v4())).await;

        let service = case_service(&pool);
        let balance_service = BalanceService::new(pool.clone());

        let case_a = service
            .create_case(user_id, create_test_request())
            .await
            .expect("Case creation should succeed");
        service
            .create_case(user_id, create_test_request())
            .await
            .expect("Case creation should succeed");

        // Move one case to complete and correct its amount
        service
            .update_case(
                case_a.id,
                CaseChanges {
                    status: Some(CaseStatus::Complete),
                    amount_cents: Some(100_000),
                },
            )
            .await
            .expect("Case update should succeed");

        let summary = balance_service
            .get_for_user(user_id)
            .await
            .expect("Summary fetch should succeed");

        assert_eq!(summary.total_cases, 2);
        assert_eq!(summary.pending_cases, 1);
        assert_eq!(summary.completed_cases, 1);
        assert_eq!(summary.amount_lost_cents, 100_000 + 250_000);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_reapplying_status_is_idempotent() {
        let pool = setup_test_db().await;
        let user_id = seed_user(&pool, &format!("{}@example.com", Uuid::new_v4())).await;

        let service = case_service(&pool);
        let balance_service = BalanceService::new(pool.clone());

        let case = service
            .create_case(user_id, create_test_request())
            .await
            .expect("Case creation should succeed");

        for _ in 0..3 {
            service
                .update_case(
                    case.id,
                    CaseChanges {
                        status: Some(CaseStatus::Pending),
                        amount_cents: None,
                    },
                )
                .await
                .expect("Case update should succeed");
        }

        let summary = balance_service
            .get_for_user(user_id)
            .await
            .expect("Summary fetch should succeed");

        assert_eq!(summary.total_cases, 1);
        assert_eq!(summary.pending_cases, 1);
        assert_eq!(summary.amount_lost_cents, 250_000);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_recovery_amount_survives_recompute() {
        let pool = setup_test_db().await;
        let user_id = seed_user(&pool, &format!("{}@example.com", Uuid::new_v4())).await;

        let service = case_service(&pool);
        let balance_service = BalanceService::new(pool.clone());

        let case = service
            .create_case(user_id, create_test_request())
            .await
            .expect("Case creation should succeed");

        balance_service
            .set_recovery(user_id, 50_000, Some("Partial chargeback".to_string()))
            .await
            .expect("Recovery update should succeed");

        // A subsequent case recompute must not clobber the recovered amount
        service
            .update_case(
                case.id,
                CaseChanges {
                    status: Some(CaseStatus::Complete),
                    amount_cents: None,
                },
            )
            .await
            .expect("Case update should succeed");

        let summary = balance_service
            .get_for_user(user_id)
            .await
            .expect("Summary fetch should succeed");

        assert_eq!(summary.amount_recovered_cents, 50_000);
        assert_eq!(summary.recovery_notes.as_deref(), Some("Partial chargeback"));
        assert_eq!(summary.completed_cases, 1);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_submission_promotion_links_case() {
        let pool = setup_test_db().await;
        let email = format!("{}@example.com", Uuid::new_v4());
        let user_id = seed_user(&pool, &email).await;

        let case_service = case_service(&pool);
        let submission_service = SubmissionService::new(pool.clone(), case_service.clone());

        let submission = submission_service
            .create_submission(CreateSubmissionRequest {
                requester_name: "Alex Doe".to_string(),
                requester_email: email.clone(),
                requester_phone: None,
                scam_category: "Crypto Scam".to_string(),
                amount: "1200".to_string(),
                description: "Sent funds to a fake exchange".to_string(),
                evidence_text: Some("https://example.com/chat.png".to_string()),
            })
            .await
            .expect("Submission creation should succeed");

        assert_eq!(submission.status, SubmissionStatus::Pending);

        // Triage into in_progress promotes it to a case for the registered user
        submission_service
            .update_submission(
                submission.id,
                UpdateSubmissionRequest {
                    status: Some(SubmissionStatus::InProgress),
                    admin_notes: Some("Verified requester identity".to_string()),
                },
            )
            .await
            .expect("Submission update should succeed");

        let case = case_service
            .find_by_submission(submission.id)
            .await
            .expect("Case lookup should succeed")
            .expect("Submission should have been promoted");

        assert_eq!(case.user_id, user_id);
        assert_eq!(case.status, CaseStatus::InProgress);
        assert_eq!(case.amount_cents, 120_000);

        // Resolving the submission syncs the existing case instead of creating
        // a second one
        submission_service
            .update_submission(
                submission.id,
                UpdateSubmissionRequest {
                    status: Some(SubmissionStatus::Resolved),
                    admin_notes: None,
                },
            )
            .await
            .expect("Submission update should succeed");

        let cases = case_service
            .list_cases(ListCasesQuery {
                user_id: Some(user_id),
                status: None,
                page: None,
                limit: None,
            })
            .await
            .expect("Case listing should succeed");

        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].status, CaseStatus::Complete);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_unregistered_requester_stays_unpromoted() {
        let pool = setup_test_db().await;

        let case_service = case_service(&pool);
        let submission_service = SubmissionService::new(pool.clone(), case_service.clone());

        let submission = submission_service
            .create_submission(CreateSubmissionRequest {
                requester_name: "Sam Roe".to_string(),
                requester_email: format!("{}@nowhere.example", Uuid::new_v4()),
                requester_phone: None,
                scam_category: "Phishing".to_string(),
                amount: "300".to_string(),
                description: "Clicked a fake bank link".to_string(),
                evidence_text: None,
            })
            .await
            .expect("Submission creation should succeed");

        let updated = submission_service
            .update_submission(
                submission.id,
                UpdateSubmissionRequest {
                    status: Some(SubmissionStatus::InProgress),
                    admin_notes: None,
                },
            )
            .await
            .expect("Submission update should succeed");

        // Triage write lands even though no case could be created
        assert_eq!(updated.status, SubmissionStatus::InProgress);

        let case = case_service
            .find_by_submission(submission.id)
            .await
            .expect("Case lookup should succeed");
        assert!(case.is_none());
    }

    #[tokio::test]
    async fn test_create_request_validation() {
        let request = CreateCaseRequest {
            title: "".to_string(),
            description: "something".to_string(),
            scam_category: "Phishing".to_string(),
            amount: "100".to_string(),
            evidence: None,
        };
        assert!(request.validate().is_err());

        let request = CreateCaseRequest {
            title: "Phishing loss".to_string(),
            description: "Clicked a fake bank link".to_string(),
            scam_category: "Phishing".to_string(),
            amount: "0".to_string(),
            evidence: None,
        };
        assert!(request.validate().is_err());
    }

    #[tokio::test]
    async fn test_status_mapping() {
        assert_eq!(
            SubmissionStatus::Resolved.as_case_status(),
            CaseStatus::Complete
        );
        assert_eq!(
            SubmissionStatus::Rejected.as_case_status(),
            CaseStatus::Closed
        );
    }
}
