#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::policies::{NewPolicy, PolicyServiceTrait, PolicyUpdate};
    use crate::test_support::{actor, Fixture};
    use crate::users::{Actor, Role};
    use crate::Error;

    fn finance() -> Actor {
        actor("fin-1", Role::Finance, "Finance")
    }

    fn policy_for(department: &str) -> NewPolicy {
        NewPolicy {
            department: department.to_string(),
            meal_limit_per_day: dec!(75),
            hotel_limit_per_night: dec!(250),
            receipt_required_over: dec!(25),
            auto_approve_limit: dec!(100),
            blacklisted_vendors: Vec::new(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn employees_only_see_their_department_policy() {
        let fixture = Fixture::new();
        let sales = fixture
            .policy_service
            .create_policy(&finance(), policy_for("Sales"))
            .await
            .unwrap();
        let ops = fixture
            .policy_service
            .create_policy(&finance(), policy_for("Ops"))
            .await
            .unwrap();

        let employee = actor("emp-1", Role::Employee, "Sales");
        let listed = fixture.policy_service.list_policies(&employee).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, sales.id);
        assert_eq!(
            fixture.policy_service.get_policy(&employee, &sales.id).unwrap().department,
            "Sales"
        );
        assert!(matches!(
            fixture.policy_service.get_policy(&employee, &ops.id),
            Err(Error::PermissionDenied(_))
        ));

        let manager = actor("mgr-1", Role::Manager, "Sales");
        assert_eq!(fixture.policy_service.list_policies(&manager).unwrap().len(), 2);
        assert!(fixture.policy_service.get_policy(&manager, &ops.id).is_ok());
    }

    #[tokio::test]
    async fn second_policy_for_a_department_conflicts() {
        let fixture = Fixture::new();
        fixture
            .policy_service
            .create_policy(&finance(), policy_for("Sales"))
            .await
            .unwrap();

        let duplicate = fixture
            .policy_service
            .create_policy(&finance(), policy_for("  Sales "))
            .await;
        assert!(matches!(duplicate, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn only_finance_and_admins_manage_policies() {
        let fixture = Fixture::new();
        for role in [Role::Employee, Role::Manager, Role::Executive] {
            let result = fixture
                .policy_service
                .create_policy(&actor("x", role, "Sales"), policy_for("Sales"))
                .await;
            assert!(matches!(result, Err(Error::PermissionDenied(_))), "{}", role);
        }
        assert!(fixture
            .policy_service
            .create_policy(&actor("adm-1", Role::Admin, "HQ"), policy_for("Sales"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn update_normalizes_and_rejects_negative_limits() {
        let fixture = Fixture::new();
        let policy = fixture
            .policy_service
            .create_policy(&finance(), policy_for("Sales"))
            .await
            .unwrap();

        let updated = fixture
            .policy_service
            .update_policy(
                &finance(),
                &policy.id,
                PolicyUpdate {
                    auto_approve_limit: Some(dec!(60)),
                    blacklisted_vendors: Some(vec![
                        " Shady Casino ".to_string(),
                        "SHADY CASINO".to_string(),
                        " ".to_string(),
                    ]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.auto_approve_limit, dec!(60));
        assert_eq!(updated.meal_limit_per_day, dec!(75));
        assert_eq!(updated.blacklisted_vendors, vec!["Shady Casino".to_string()]);

        let negative = fixture
            .policy_service
            .update_policy(
                &finance(),
                &policy.id,
                PolicyUpdate {
                    hotel_limit_per_night: Some(dec!(-1)),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(negative, Err(Error::Validation(_))));
        assert_eq!(
            fixture
                .policy_service
                .get_policy(&finance(), &policy.id)
                .unwrap()
                .hotel_limit_per_night,
            dec!(250)
        );
    }

    #[tokio::test]
    async fn inactive_policy_is_not_applied_and_delete_twice_is_not_found() {
        let fixture = Fixture::new();
        let policy = fixture
            .policy_service
            .create_policy(
                &finance(),
                NewPolicy {
                    is_active: false,
                    ..policy_for("Sales")
                },
            )
            .await
            .unwrap();
        let company_id = finance().company_id;
        assert!(fixture
            .policy_service
            .policy_for_department(&company_id, "Sales")
            .unwrap()
            .is_none());

        fixture
            .policy_service
            .delete_policy(&finance(), &policy.id)
            .await
            .unwrap();
        assert!(matches!(
            fixture.policy_service.delete_policy(&finance(), &policy.id).await,
            Err(Error::NotFound(_))
        ));
    }
}
