//! Use-case and router tests for the marketplace crate, run against the
//! in-memory repository.

mod support {
    use rust_decimal::Decimal;
    use std::sync::Arc;

    use crate::application::config::MarketplaceConfig;
    use crate::application::{PurchaseRequestWorkflow, SaleRegistrar, UserDirectory, VehicleCatalog};
    use crate::domain::entity::user::ContactDetails;
    use crate::domain::entity::{User, Vehicle, VehicleDetails};
    use crate::domain::repository::{UserRepository, VehicleRepository};
    use crate::domain::value_object::{
        email::Email, user_password::UserPassword, user_role::UserRole,
    };
    use crate::infra::memory::InMemoryMarketplaceRepository;

    /// Argon2id PHC string that verifies nothing; seeds users without paying
    /// for a real hash.
    pub const DUMMY_PHC: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$3kRnJ+RUmqKNw4uQMUyKzTg8W5jq1yyGU0VBx2nrbNk";

    pub type Repo = InMemoryMarketplaceRepository;

    pub fn repo() -> Arc<Repo> {
        Arc::new(InMemoryMarketplaceRepository::new())
    }

    pub fn config() -> Arc<MarketplaceConfig> {
        Arc::new(MarketplaceConfig::default())
    }

    pub fn users(repo: &Arc<Repo>) -> UserDirectory<Repo> {
        UserDirectory::new(repo.clone(), config())
    }

    pub fn catalog(repo: &Arc<Repo>) -> VehicleCatalog<Repo> {
        VehicleCatalog::new(repo.clone(), config())
    }

    pub fn workflow(repo: &Arc<Repo>) -> PurchaseRequestWorkflow<Repo, Repo, Repo, Repo> {
        PurchaseRequestWorkflow::new(repo.clone(), repo.clone(), repo.clone(), repo.clone())
    }

    pub fn registrar(repo: &Arc<Repo>) -> SaleRegistrar<Repo, Repo, Repo> {
        SaleRegistrar::new(repo.clone(), repo.clone(), repo.clone())
    }

    pub async fn seed_user(repo: &Repo, email: &str, role: UserRole) -> User {
        let user = User::new(
            "Test User",
            Email::new(email).unwrap(),
            UserPassword::from_db(DUMMY_PHC).unwrap(),
            role,
            ContactDetails::default(),
        )
        .unwrap();
        UserRepository::create(repo, &user).await.unwrap();
        user
    }

    pub fn details(brand: &str, model: &str, year: i32, price: Decimal) -> VehicleDetails {
        VehicleDetails {
            brand: brand.to_string(),
            model: model.to_string(),
            year,
            color: "Prata".to_string(),
            price,
            vehicle_type: "Sedan".to_string(),
            photo_urls: vec!["https://cdn.example.com/1.jpg".to_string()],
        }
    }

    pub async fn seed_vehicle(repo: &Repo, vendor: &User, price: Decimal) -> Vehicle {
        let vehicle = Vehicle::list(vendor.id, details("Volkswagen", "Gol", 2015, price)).unwrap();
        VehicleRepository::create(repo, &vehicle).await.unwrap();
        vehicle
    }
}

mod workflow_tests {
    use rust_decimal_macros::dec;

    use super::support::*;
    use crate::domain::repository::{SaleRepository, VehicleRepository};
    use crate::domain::value_object::{
        PurchaseRequestId, VehicleId, purchase_request_status::PurchaseRequestStatus,
        user_role::UserRole,
    };
    use crate::error::MarketplaceError;

    #[tokio::test]
    async fn test_create_opens_pending_request_addressed_to_owner() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let buyer = seed_user(&repo, "buyer@example.com", UserRole::Buyer).await;
        let vehicle = seed_vehicle(&repo, &vendor, dec!(45000.00)).await;

        let request = workflow(&repo).create(&vehicle.id, &buyer).await.unwrap();

        assert_eq!(request.status, PurchaseRequestStatus::Pending);
        assert_eq!(request.vendor_id, vendor.id);
        assert_eq!(request.buyer_id, buyer.id);
        assert!(request.response_date.is_none());

        let stored = workflow(&repo).get(&request.id).await.unwrap();
        assert_eq!(stored.id, request.id);
    }

    #[tokio::test]
    async fn test_create_for_missing_vehicle_fails() {
        let repo = repo();
        let buyer = seed_user(&repo, "buyer@example.com", UserRole::Buyer).await;

        let err = workflow(&repo)
            .create(&VehicleId::new(), &buyer)
            .await
            .unwrap_err();

        assert!(matches!(err, MarketplaceError::VehicleNotFound));
    }

    #[tokio::test]
    async fn test_create_for_sold_vehicle_fails() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let buyer = seed_user(&repo, "buyer@example.com", UserRole::Buyer).await;
        let vehicle = seed_vehicle(&repo, &vendor, dec!(45000.00)).await;
        assert!(VehicleRepository::mark_sold(repo.as_ref(), &vehicle.id).await.unwrap());

        let err = workflow(&repo).create(&vehicle.id, &buyer).await.unwrap_err();

        assert!(matches!(err, MarketplaceError::VehicleAlreadySold));
    }

    #[tokio::test]
    async fn test_only_one_pending_request_per_vehicle() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let first = seed_user(&repo, "first@example.com", UserRole::Buyer).await;
        let second = seed_user(&repo, "second@example.com", UserRole::Buyer).await;
        let vehicle = seed_vehicle(&repo, &vendor, dec!(45000.00)).await;

        workflow(&repo).create(&vehicle.id, &first).await.unwrap();
        let err = workflow(&repo).create(&vehicle.id, &second).await.unwrap_err();

        assert!(matches!(err, MarketplaceError::PendingRequestExists));
    }

    #[tokio::test]
    async fn test_cannot_request_own_vehicle() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let vehicle = seed_vehicle(&repo, &vendor, dec!(45000.00)).await;

        let err = workflow(&repo).create(&vehicle.id, &vendor).await.unwrap_err();

        assert!(matches!(err, MarketplaceError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_accept_sells_vehicle_at_listed_price() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let buyer = seed_user(&repo, "buyer@example.com", UserRole::Buyer).await;
        let vehicle = seed_vehicle(&repo, &vendor, dec!(45000.00)).await;
        let request = workflow(&repo).create(&vehicle.id, &buyer).await.unwrap();

        let accepted = workflow(&repo).accept(&request.id, &vendor).await.unwrap();

        assert_eq!(accepted.status, PurchaseRequestStatus::Accepted);
        assert!(accepted.response_date.is_some());

        let stored = workflow(&repo).get(&request.id).await.unwrap();
        assert_eq!(stored.status, PurchaseRequestStatus::Accepted);

        let vehicle = VehicleRepository::find_by_id(repo.as_ref(), &vehicle.id)
            .await
            .unwrap()
            .unwrap();
        assert!(vehicle.sold);

        let sales = SaleRepository::list(repo.as_ref()).await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].vehicle_id, vehicle.id);
        assert_eq!(sales[0].buyer_id, buyer.id);
        assert_eq!(sales[0].vendor_id, vendor.id);
        assert_eq!(sales[0].price.amount(), dec!(45000.00));
    }

    #[tokio::test]
    async fn test_deny_leaves_vehicle_on_the_market() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let buyer = seed_user(&repo, "buyer@example.com", UserRole::Buyer).await;
        let vehicle = seed_vehicle(&repo, &vendor, dec!(45000.00)).await;
        let request = workflow(&repo).create(&vehicle.id, &buyer).await.unwrap();

        let denied = workflow(&repo).deny(&request.id, &vendor).await.unwrap();

        assert_eq!(denied.status, PurchaseRequestStatus::Denied);
        assert!(denied.response_date.is_some());

        let vehicle = VehicleRepository::find_by_id(repo.as_ref(), &vehicle.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!vehicle.sold);
        assert!(SaleRepository::list(repo.as_ref()).await.unwrap().is_empty());

        // The vehicle is free for a new request.
        workflow(&repo).create(&vehicle.id, &buyer).await.unwrap();
    }

    #[tokio::test]
    async fn test_terminal_requests_cannot_be_answered_again() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let buyer = seed_user(&repo, "buyer@example.com", UserRole::Buyer).await;

        let denied_vehicle = seed_vehicle(&repo, &vendor, dec!(30000)).await;
        let denied = workflow(&repo).create(&denied_vehicle.id, &buyer).await.unwrap();
        workflow(&repo).deny(&denied.id, &vendor).await.unwrap();

        let err = workflow(&repo).accept(&denied.id, &vendor).await.unwrap_err();
        assert!(matches!(
            err,
            MarketplaceError::RequestNotPending(PurchaseRequestStatus::Denied)
        ));
        let err = workflow(&repo).deny(&denied.id, &vendor).await.unwrap_err();
        assert!(matches!(
            err,
            MarketplaceError::RequestNotPending(PurchaseRequestStatus::Denied)
        ));

        let accepted_vehicle = seed_vehicle(&repo, &vendor, dec!(30000)).await;
        let accepted = workflow(&repo)
            .create(&accepted_vehicle.id, &buyer)
            .await
            .unwrap();
        workflow(&repo).accept(&accepted.id, &vendor).await.unwrap();

        let err = workflow(&repo).deny(&accepted.id, &vendor).await.unwrap_err();
        assert!(matches!(
            err,
            MarketplaceError::RequestNotPending(PurchaseRequestStatus::Accepted)
        ));
        assert_eq!(SaleRepository::list(repo.as_ref()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_only_the_owning_vendor_can_answer() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let other = seed_user(&repo, "other@example.com", UserRole::Vendor).await;
        let buyer = seed_user(&repo, "buyer@example.com", UserRole::Buyer).await;
        let vehicle = seed_vehicle(&repo, &vendor, dec!(45000.00)).await;
        let request = workflow(&repo).create(&vehicle.id, &buyer).await.unwrap();

        let err = workflow(&repo).accept(&request.id, &other).await.unwrap_err();
        assert!(matches!(err, MarketplaceError::NotOwner(_)));
        let err = workflow(&repo).deny(&request.id, &other).await.unwrap_err();
        assert!(matches!(err, MarketplaceError::NotOwner(_)));

        let stored = workflow(&repo).get(&request.id).await.unwrap();
        assert!(stored.is_pending());
    }

    #[tokio::test]
    async fn test_accept_after_manual_sale_keeps_request_pending() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let buyer = seed_user(&repo, "buyer@example.com", UserRole::Buyer).await;
        let vehicle = seed_vehicle(&repo, &vendor, dec!(45000.00)).await;
        let request = workflow(&repo).create(&vehicle.id, &buyer).await.unwrap();

        catalog(&repo).mark_as_sold(&vehicle.id, &vendor).await.unwrap();

        let err = workflow(&repo).accept(&request.id, &vendor).await.unwrap_err();
        assert!(matches!(err, MarketplaceError::VehicleAlreadySold));

        let stored = workflow(&repo).get(&request.id).await.unwrap();
        assert!(stored.is_pending());
        assert!(SaleRepository::list(repo.as_ref()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lists_by_buyer_and_vendor() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let other_vendor = seed_user(&repo, "other@example.com", UserRole::Vendor).await;
        let buyer = seed_user(&repo, "buyer@example.com", UserRole::Buyer).await;
        let other_buyer = seed_user(&repo, "other-buyer@example.com", UserRole::Buyer).await;

        let first = seed_vehicle(&repo, &vendor, dec!(10000)).await;
        let second = seed_vehicle(&repo, &other_vendor, dec!(20000)).await;
        workflow(&repo).create(&first.id, &buyer).await.unwrap();
        workflow(&repo).create(&second.id, &buyer).await.unwrap();

        let by_buyer = workflow(&repo).list_by_buyer(&buyer.id).await.unwrap();
        assert_eq!(by_buyer.len(), 2);
        assert!(workflow(&repo)
            .list_by_buyer(&other_buyer.id)
            .await
            .unwrap()
            .is_empty());

        let by_vendor = workflow(&repo).list_by_vendor(&vendor.id).await.unwrap();
        assert_eq!(by_vendor.len(), 1);
        assert_eq!(by_vendor[0].vehicle_id, first.id);
    }

    #[tokio::test]
    async fn test_delete_request() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let buyer = seed_user(&repo, "buyer@example.com", UserRole::Buyer).await;
        let vehicle = seed_vehicle(&repo, &vendor, dec!(45000.00)).await;
        let request = workflow(&repo).create(&vehicle.id, &buyer).await.unwrap();

        workflow(&repo).delete(&request.id).await.unwrap();

        let err = workflow(&repo).get(&request.id).await.unwrap_err();
        assert!(matches!(err, MarketplaceError::PurchaseRequestNotFound));
        let err = workflow(&repo).delete(&request.id).await.unwrap_err();
        assert!(matches!(err, MarketplaceError::PurchaseRequestNotFound));
        let err = workflow(&repo)
            .accept(&PurchaseRequestId::new(), &vendor)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketplaceError::PurchaseRequestNotFound));
    }
}

mod sale_tests {
    use rust_decimal_macros::dec;

    use super::support::*;
    use crate::domain::repository::VehicleRepository;
    use crate::domain::value_object::{SaleId, UserId, VehicleId, user_role::UserRole};
    use crate::error::MarketplaceError;
    use crate::presentation::dto::SaleResponse;

    #[tokio::test]
    async fn test_non_positive_price_fails_before_any_lookup() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;

        for price in [dec!(0), dec!(-1500.00)] {
            // Neither the vehicle nor the buyer exists.
            let err = registrar(&repo)
                .register_sale(&VehicleId::new(), &UserId::new(), price, &vendor)
                .await
                .unwrap_err();
            assert!(matches!(err, MarketplaceError::InvalidArgument(_)), "{price}");
        }
    }

    #[tokio::test]
    async fn test_sale_price_is_kept_in_cents() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let buyer = seed_user(&repo, "buyer@example.com", UserRole::Buyer).await;
        let vehicle = seed_vehicle(&repo, &vendor, dec!(45000.00)).await;

        let sale = registrar(&repo)
            .register_sale(&vehicle.id, &buyer.id, dec!(10.5000), &vendor)
            .await
            .unwrap();

        let stored = registrar(&repo).get_sale(&sale.id).await.unwrap();
        let body = serde_json::to_value(SaleResponse::from(stored)).unwrap();
        assert_eq!(body["price"], "10.50");
    }

    #[tokio::test]
    async fn test_register_sale_marks_vehicle_sold_once() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let buyer = seed_user(&repo, "buyer@example.com", UserRole::Buyer).await;
        let vehicle = seed_vehicle(&repo, &vendor, dec!(45000.00)).await;

        let sale = registrar(&repo)
            .register_sale(&vehicle.id, &buyer.id, dec!(43500.00), &vendor)
            .await
            .unwrap();

        assert_eq!(sale.price.amount(), dec!(43500.00));
        assert_eq!(sale.vendor_id, vendor.id);
        let stored = VehicleRepository::find_by_id(repo.as_ref(), &vehicle.id)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.sold);

        let err = registrar(&repo)
            .register_sale(&vehicle.id, &buyer.id, dec!(43500.00), &vendor)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketplaceError::VehicleAlreadySold));
        assert_eq!(registrar(&repo).list_sales().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_sale_checks_owner_and_buyer() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let other = seed_user(&repo, "other@example.com", UserRole::Vendor).await;
        let buyer = seed_user(&repo, "buyer@example.com", UserRole::Buyer).await;
        let vehicle = seed_vehicle(&repo, &vendor, dec!(45000.00)).await;

        let err = registrar(&repo)
            .register_sale(&VehicleId::new(), &buyer.id, dec!(100), &vendor)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketplaceError::VehicleNotFound));

        let err = registrar(&repo)
            .register_sale(&vehicle.id, &buyer.id, dec!(100), &other)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketplaceError::NotOwner(_)));

        let err = registrar(&repo)
            .register_sale(&vehicle.id, &UserId::new(), dec!(100), &vendor)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketplaceError::UserNotFound));

        let stored = VehicleRepository::find_by_id(repo.as_ref(), &vehicle.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.sold);
    }

    #[tokio::test]
    async fn test_delete_sale_puts_vehicle_back_on_the_market() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let buyer = seed_user(&repo, "buyer@example.com", UserRole::Buyer).await;
        let vehicle = seed_vehicle(&repo, &vendor, dec!(45000.00)).await;
        let sale = registrar(&repo)
            .register_sale(&vehicle.id, &buyer.id, dec!(45000.00), &vendor)
            .await
            .unwrap();

        registrar(&repo).delete_sale(&sale.id).await.unwrap();

        let stored = VehicleRepository::find_by_id(repo.as_ref(), &vehicle.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.sold);
        let err = registrar(&repo).get_sale(&sale.id).await.unwrap_err();
        assert!(matches!(err, MarketplaceError::SaleNotFound));
        let err = registrar(&repo).delete_sale(&SaleId::new()).await.unwrap_err();
        assert!(matches!(err, MarketplaceError::SaleNotFound));

        // Sellable again.
        workflow(&repo).create(&vehicle.id, &buyer).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_sale_changes_only_buyer_and_price() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let other = seed_user(&repo, "other@example.com", UserRole::Vendor).await;
        let buyer = seed_user(&repo, "buyer@example.com", UserRole::Buyer).await;
        let new_buyer = seed_user(&repo, "new-buyer@example.com", UserRole::Buyer).await;
        let vehicle = seed_vehicle(&repo, &vendor, dec!(45000.00)).await;
        let sale = registrar(&repo)
            .register_sale(&vehicle.id, &buyer.id, dec!(45000.00), &vendor)
            .await
            .unwrap();

        let updated = registrar(&repo)
            .update_sale(&sale.id, &new_buyer.id, dec!(44000.50), &vendor)
            .await
            .unwrap();

        assert_eq!(updated.buyer_id, new_buyer.id);
        assert_eq!(updated.price.amount(), dec!(44000.50));
        assert_eq!(updated.vehicle_id, sale.vehicle_id);
        assert_eq!(updated.vendor_id, sale.vendor_id);
        assert_eq!(updated.sale_date, sale.sale_date);

        let stored = registrar(&repo).get_sale(&sale.id).await.unwrap();
        assert_eq!(stored.buyer_id, new_buyer.id);

        let err = registrar(&repo)
            .update_sale(&sale.id, &new_buyer.id, dec!(0), &vendor)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketplaceError::InvalidArgument(_)));

        let err = registrar(&repo)
            .update_sale(&sale.id, &new_buyer.id, dec!(100), &other)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketplaceError::NotOwner(_)));

        let err = registrar(&repo)
            .update_sale(&sale.id, &UserId::new(), dec!(100), &vendor)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketplaceError::UserNotFound));
    }

    #[tokio::test]
    async fn test_list_sales_by_vendor() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let other = seed_user(&repo, "other@example.com", UserRole::Vendor).await;
        let buyer = seed_user(&repo, "buyer@example.com", UserRole::Buyer).await;
        let mine = seed_vehicle(&repo, &vendor, dec!(10000)).await;
        let theirs = seed_vehicle(&repo, &other, dec!(20000)).await;

        registrar(&repo)
            .register_sale(&mine.id, &buyer.id, dec!(10000), &vendor)
            .await
            .unwrap();
        registrar(&repo)
            .register_sale(&theirs.id, &buyer.id, dec!(20000), &other)
            .await
            .unwrap();

        let sales = registrar(&repo).list_sales_by_vendor(&vendor.id).await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].vehicle_id, mine.id);
        assert_eq!(registrar(&repo).list_sales().await.unwrap().len(), 2);
    }
}

mod catalog_tests {
    use rust_decimal_macros::dec;

    use super::support::*;
    use crate::domain::repository::PurchaseRequestRepository;
    use crate::domain::value_object::{
        VehicleId, user_role::UserRole, vehicle_filter::VehicleFilter,
    };
    use crate::error::MarketplaceError;

    #[tokio::test]
    async fn test_register_requires_vendor_role() {
        let repo = repo();
        let buyer = seed_user(&repo, "buyer@example.com", UserRole::Buyer).await;

        let err = catalog(&repo)
            .register(&buyer, details("Fiat", "Uno", 2010, dec!(15000)))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            MarketplaceError::RoleMismatch {
                expected: UserRole::Vendor
            }
        ));
    }

    #[tokio::test]
    async fn test_register_validates_listing() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;

        for bad in [
            details("Fiat", "Uno", 1850, dec!(15000)),
            details("Fiat", "Uno", 2010, dec!(0)),
            details("  ", "Uno", 2010, dec!(15000)),
        ] {
            let err = catalog(&repo).register(&vendor, bad).await.unwrap_err();
            assert!(matches!(err, MarketplaceError::InvalidArgument(_)));
        }

        let vehicle = catalog(&repo)
            .register(&vendor, details("Fiat", "Uno", 2010, dec!(15000)))
            .await
            .unwrap();
        assert!(!vehicle.sold);
        assert_eq!(vehicle.vendor_id, vendor.id);
    }

    #[tokio::test]
    async fn test_search_filters_case_insensitively() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let catalog = catalog(&repo);
        catalog
            .register(&vendor, details("Volkswagen", "Gol", 2015, dec!(30000)))
            .await
            .unwrap();
        catalog
            .register(&vendor, details("Volkswagen", "Golf", 2019, dec!(90000)))
            .await
            .unwrap();
        let uno = catalog
            .register(&vendor, details("Fiat", "Uno", 2010, dec!(15000)))
            .await
            .unwrap();
        catalog.mark_as_sold(&uno.id, &vendor).await.unwrap();

        let filter = VehicleFilter::new(Some("VOLKS".into()), Some("gol".into()), None, None);
        let page = catalog.search(&filter, None, None).await.unwrap();
        assert_eq!(page.total_items, 2);

        let filter = VehicleFilter::new(None, Some("GOLF".into()), Some(2019), None);
        let page = catalog.search(&filter, None, None).await.unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].model, "Golf");

        let filter = VehicleFilter::new(None, None, None, Some(true));
        let page = catalog.search(&filter, None, None).await.unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].id, uno.id);

        let page = catalog
            .search(&VehicleFilter::default(), None, None)
            .await
            .unwrap();
        assert_eq!(page.total_items, 3);
    }

    #[tokio::test]
    async fn test_search_pages_are_bounded() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        for _ in 0..3 {
            seed_vehicle(&repo, &vendor, dec!(30000)).await;
        }
        let catalog = catalog(&repo);
        let all = VehicleFilter::default();

        let first = catalog.search(&all, Some(0), Some(2)).await.unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.total_items, 3);
        assert_eq!(first.total_pages, 2);

        let second = catalog.search(&all, Some(1), Some(2)).await.unwrap();
        assert_eq!(second.items.len(), 1);
        assert!(first.items.iter().all(|v| v.id != second.items[0].id));

        let beyond = catalog.search(&all, Some(5), Some(2)).await.unwrap();
        assert!(beyond.items.is_empty());

        let capped = catalog.search(&all, None, Some(10_000)).await.unwrap();
        assert_eq!(capped.size, 100);

        let defaulted = catalog.search(&all, None, None).await.unwrap();
        assert_eq!(defaulted.size, 10);
    }

    #[tokio::test]
    async fn test_update_requires_owner_and_keeps_sold_flag() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let other = seed_user(&repo, "other@example.com", UserRole::Vendor).await;
        let vehicle = seed_vehicle(&repo, &vendor, dec!(30000)).await;

        let err = catalog(&repo)
            .update(&vehicle.id, &other, details("Fiat", "Uno", 2010, dec!(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, MarketplaceError::NotOwner(_)));

        let updated = catalog(&repo)
            .update(&vehicle.id, &vendor, details("Volkswagen", "Gol G5", 2016, dec!(32000)))
            .await
            .unwrap();
        assert_eq!(updated.model, "Gol G5");
        assert_eq!(updated.price.amount(), dec!(32000));
        assert!(!updated.sold);

        let stored = catalog(&repo).get(&vehicle.id).await.unwrap();
        assert_eq!(stored.year, 2016);

        let err = catalog(&repo)
            .update(&VehicleId::new(), &vendor, details("Fiat", "Uno", 2010, dec!(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, MarketplaceError::VehicleNotFound));
    }

    #[tokio::test]
    async fn test_mark_as_sold_twice_fails() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let vehicle = seed_vehicle(&repo, &vendor, dec!(30000)).await;

        let sold = catalog(&repo).mark_as_sold(&vehicle.id, &vendor).await.unwrap();
        assert!(sold.sold);

        let err = catalog(&repo)
            .mark_as_sold(&vehicle.id, &vendor)
            .await
            .unwrap_err();
        assert!(matches!(err, MarketplaceError::VehicleAlreadySold));
    }

    #[tokio::test]
    async fn test_delete_removes_requests_but_not_sold_vehicles() {
        let repo = repo();
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let buyer = seed_user(&repo, "buyer@example.com", UserRole::Buyer).await;
        let listed = seed_vehicle(&repo, &vendor, dec!(30000)).await;
        let request = workflow(&repo).create(&listed.id, &buyer).await.unwrap();

        catalog(&repo).delete(&listed.id, &vendor).await.unwrap();

        let err = catalog(&repo).get(&listed.id).await.unwrap_err();
        assert!(matches!(err, MarketplaceError::VehicleNotFound));
        assert!(PurchaseRequestRepository::find_by_id(repo.as_ref(), &request.id)
            .await
            .unwrap()
            .is_none());

        let sold = seed_vehicle(&repo, &vendor, dec!(30000)).await;
        registrar(&repo)
            .register_sale(&sold.id, &buyer.id, dec!(30000), &vendor)
            .await
            .unwrap();
        let err = catalog(&repo).delete(&sold.id, &vendor).await.unwrap_err();
        assert!(matches!(err, MarketplaceError::InvalidState(_)));
    }
}

mod user_tests {
    use super::support::*;
    use crate::application::RegisterUserInput;
    use crate::domain::value_object::{UserId, user_role::UserRole};
    use crate::error::MarketplaceError;

    const PASSWORD: &str = "Opala-Diplomata-1988";

    fn input(email: &str, role: UserRole) -> RegisterUserInput {
        RegisterUserInput {
            name: "Ana Souza".to_string(),
            email: email.to_string(),
            password: PASSWORD.to_string(),
            role,
            phone_number: Some(" +55 11 91234-5678 ".to_string()),
            cpf: None,
            date_of_birth: None,
        }
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let repo = repo();
        let users = users(&repo);

        let user = users
            .register(input("Ana@Example.com", UserRole::Vendor))
            .await
            .unwrap();
        assert_eq!(user.email.as_str(), "ana@example.com");
        assert_eq!(user.phone_number.as_deref(), Some("+55 11 91234-5678"));
        assert!(user.password.as_phc_string().starts_with("$argon2id$"));

        let authenticated = users
            .authenticate("ana@example.com", PASSWORD, UserRole::Vendor)
            .await
            .unwrap();
        assert_eq!(authenticated.id, user.id);
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_look_the_same() {
        let repo = repo();
        let users = users(&repo);
        users
            .register(input("ana@example.com", UserRole::Buyer))
            .await
            .unwrap();

        let unknown = users
            .authenticate("nobody@example.com", PASSWORD, UserRole::Buyer)
            .await
            .unwrap_err();
        let wrong = users
            .authenticate("ana@example.com", "Opala-Diplomata-1989", UserRole::Buyer)
            .await
            .unwrap_err();
        let malformed = users
            .authenticate("not-an-email", PASSWORD, UserRole::Buyer)
            .await
            .unwrap_err();

        assert!(matches!(unknown, MarketplaceError::InvalidCredentials));
        assert!(matches!(wrong, MarketplaceError::InvalidCredentials));
        assert!(matches!(malformed, MarketplaceError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_authenticate_checks_role() {
        let repo = repo();
        let users = users(&repo);
        users
            .register(input("ana@example.com", UserRole::Buyer))
            .await
            .unwrap();

        let err = users
            .authenticate("ana@example.com", PASSWORD, UserRole::Vendor)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            MarketplaceError::RoleMismatch {
                expected: UserRole::Vendor
            }
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_bad_input() {
        let repo = repo();
        let users = users(&repo);
        seed_user(&repo, "ana@example.com", UserRole::Buyer).await;

        let err = users
            .register(input("ANA@example.com", UserRole::Vendor))
            .await
            .unwrap_err();
        assert!(matches!(err, MarketplaceError::EmailTaken));

        let err = users
            .register(input("ana.example.com", UserRole::Vendor))
            .await
            .unwrap_err();
        assert!(matches!(err, MarketplaceError::InvalidArgument(_)));

        let mut weak = input("bia@example.com", UserRole::Vendor);
        weak.password = "password123".to_string();
        let err = users.register(weak).await.unwrap_err();
        assert!(matches!(err, MarketplaceError::InvalidArgument(_)));

        let mut blank_name = input("bia@example.com", UserRole::Vendor);
        blank_name.name = "   ".to_string();
        let err = users.register(blank_name).await.unwrap_err();
        assert!(matches!(err, MarketplaceError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_update_profile() {
        let repo = repo();
        let users = users(&repo);
        let ana = seed_user(&repo, "ana@example.com", UserRole::Buyer).await;
        seed_user(&repo, "bia@example.com", UserRole::Buyer).await;

        let updated = users
            .update(&ana.id, "Ana Lima", "ana.lima@example.com")
            .await
            .unwrap();
        assert_eq!(updated.name, "Ana Lima");
        assert_eq!(updated.email.as_str(), "ana.lima@example.com");
        assert_eq!(updated.role, UserRole::Buyer);

        // Keeping one's own email is not a conflict.
        users
            .update(&ana.id, "Ana L.", "ana.lima@example.com")
            .await
            .unwrap();

        let err = users
            .update(&ana.id, "Ana", "bia@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, MarketplaceError::EmailTaken));

        let err = users
            .update(&UserId::new(), "Ghost", "ghost@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, MarketplaceError::UserNotFound));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let repo = repo();
        let users = users(&repo);
        let vendor = seed_user(&repo, "vendor@example.com", UserRole::Vendor).await;
        let idle = seed_user(&repo, "idle@example.com", UserRole::Buyer).await;
        seed_vehicle(&repo, &vendor, rust_decimal_macros::dec!(1000)).await;

        let err = users.delete(&vendor.id).await.unwrap_err();
        assert!(matches!(err, MarketplaceError::InvalidState(_)));

        users.delete(&idle.id).await.unwrap();
        let err = users.get(&idle.id).await.unwrap_err();
        assert!(matches!(err, MarketplaceError::UserNotFound));
        let err = users.delete(&idle.id).await.unwrap_err();
        assert!(matches!(err, MarketplaceError::UserNotFound));

        assert_eq!(users.list().await.unwrap().len(), 1);
    }
}

mod router_tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::application::config::MarketplaceConfig;
    use crate::infra::memory::InMemoryMarketplaceRepository;
    use crate::presentation::router::marketplace_router_generic;

    fn app() -> Router {
        marketplace_router_generic(
            InMemoryMarketplaceRepository::new(),
            MarketplaceConfig::development(),
        )
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn register(app: &Router, email: &str, role: &str) -> Value {
        let (status, body) = send(
            app,
            Method::POST,
            "/users",
            Some(json!({
                "name": "Test User",
                "email": email,
                "password": "Opala-Diplomata-1988",
                "role": role,
                "phoneNumber": "11 91234-5678",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    #[tokio::test]
    async fn test_register_user_hides_password() {
        let app = app();

        let body = register(&app, "vendor@example.com", "VENDOR").await;

        assert_eq!(body["role"], "VENDOR");
        assert_eq!(body["email"], "vendor@example.com");
        assert_eq!(body["phoneNumber"], "11 91234-5678");
        assert!(body.get("password").is_none());
        assert!(!body.to_string().contains("argon2"));
    }

    #[tokio::test]
    async fn test_missing_vehicle_is_a_problem_document() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::GET,
            "/vehicles/6f1c1f53-1f0e-4a8e-9a47-5d2f6e0b8c11",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
        assert_eq!(body["detail"], "Vehicle not found");
    }

    #[tokio::test]
    async fn test_malformed_id_is_a_problem_document() {
        let app = app();

        let (status, body) = send(&app, Method::GET, "/vehicles/not-a-uuid", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
        assert_eq!(body["title"], "Bad Request");
        assert!(body["detail"].as_str().unwrap().starts_with("Invalid URL"), "{body}");
    }

    #[tokio::test]
    async fn test_missing_body_field_is_a_bad_request() {
        let app = app();

        let (status, body) = send(&app, Method::POST, "/sales", Some(json!({ "x": 1 }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
        assert!(
            body["detail"].as_str().unwrap().contains("vehicleId"),
            "{body}"
        );
    }

    #[tokio::test]
    async fn test_malformed_query_is_a_bad_request() {
        let app = app();

        let (status, body) = send(&app, Method::GET, "/vehicles?year=soon", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
    }

    #[tokio::test]
    async fn test_wrong_credentials_are_unauthorized() {
        let app = app();
        register(&app, "vendor@example.com", "VENDOR").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/vehicles",
            Some(json!({
                "brand": "Fiat",
                "model": "Uno",
                "year": 2010,
                "price": "15000.00",
                "vendorEmail": "vendor@example.com",
                "vendorPassword": "not-the-password",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_purchase_flow_over_http() {
        let app = app();
        register(&app, "vendor@example.com", "VENDOR").await;
        let buyer = register(&app, "buyer@example.com", "BUYER").await;

        let (status, vehicle) = send(
            &app,
            Method::POST,
            "/vehicles",
            Some(json!({
                "brand": "Volkswagen",
                "model": "Gol",
                "year": 2015,
                "color": "Prata",
                "price": "45000.00",
                "vehicleType": "Hatch",
                "photoUrls": ["https://cdn.example.com/gol.jpg"],
                "vendorEmail": "vendor@example.com",
                "vendorPassword": "Opala-Diplomata-1988",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{vehicle}");
        assert_eq!(vehicle["sold"], false);
        let vehicle_id = vehicle["id"].as_str().unwrap().to_string();

        let (status, page) = send(&app, Method::GET, "/vehicles?brand=volks&sold=false", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["totalItems"], 1);
        assert_eq!(page["items"][0]["id"], vehicle_id.as_str());

        let (status, request) = send(
            &app,
            Method::POST,
            "/purchase-requests",
            Some(json!({
                "vehicleId": vehicle_id,
                "buyerEmail": "buyer@example.com",
                "buyerPassword": "Opala-Diplomata-1988",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{request}");
        assert_eq!(request["status"], "PENDING");
        let request_id = request["id"].as_str().unwrap().to_string();

        // A buyer account cannot answer requests.
        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/purchase-requests/{request_id}/accept"),
            Some(json!({
                "vendorEmail": "buyer@example.com",
                "vendorPassword": "Opala-Diplomata-1988",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, accepted) = send(
            &app,
            Method::PUT,
            &format!("/purchase-requests/{request_id}/accept"),
            Some(json!({
                "vendorEmail": "vendor@example.com",
                "vendorPassword": "Opala-Diplomata-1988",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{accepted}");
        assert_eq!(accepted["status"], "ACCEPTED");

        let (status, sales) = send(&app, Method::GET, "/sales", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(sales.as_array().unwrap().len(), 1);
        assert_eq!(sales[0]["buyerId"], buyer["id"]);
        assert_eq!(sales[0]["price"], "45000.00");
        let sale_id = sales[0]["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            Method::POST,
            "/purchase-requests",
            Some(json!({
                "vehicleId": vehicle_id,
                "buyerEmail": "buyer@example.com",
                "buyerPassword": "Opala-Diplomata-1988",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(&app, Method::DELETE, &format!("/sales/{sale_id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, vehicle) = send(&app, Method::GET, &format!("/vehicles/{vehicle_id}"), None).await;
        assert_eq!(vehicle["sold"], false);
    }

    #[tokio::test]
    async fn test_register_sale_rejects_zero_price() {
        let app = app();
        register(&app, "vendor@example.com", "VENDOR").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/sales",
            Some(json!({
                "vehicleId": "6f1c1f53-1f0e-4a8e-9a47-5d2f6e0b8c11",
                "buyerId": "0b0f7a1e-7f3c-4f7c-b1a4-2f3c4d5e6f70",
                "price": "0",
                "vendorEmail": "vendor@example.com",
                "vendorPassword": "Opala-Diplomata-1988",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    }
}
