//! PostgreSQL Repository Implementations

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::domain::entity::{PurchaseRequest, Sale, User, Vehicle};
use crate::domain::repository::{
    PurchaseRequestRepository, SaleRepository, UserRepository, VehicleRepository,
};
use crate::domain::value_object::{
    PurchaseRequestId, SaleId, UserId, VehicleId,
    email::Email,
    paging::{Page, PageRequest},
    price::Price,
    purchase_request_status::PurchaseRequestStatus,
    user_password::UserPassword,
    user_role::UserRole,
    vehicle_filter::VehicleFilter,
};
use crate::error::{MarketplaceError, MarketplaceResult};

const USERS_EMAIL_KEY: &str = "users_email_key";
const ONE_PENDING_PER_VEHICLE: &str = "purchase_requests_one_pending_idx";
const ONE_SALE_PER_VEHICLE: &str = "sales_vehicle_id_key";

const USER_COLUMNS: &str = "id, name, email, password_hash, role, phone_number, cpf, \
     date_of_birth, created_at, updated_at";

const VEHICLE_COLUMNS: &str = "id, vendor_id, brand, model, year, color, price, vehicle_type, \
     photo_urls, sold, created_at, updated_at";

/// Shared by the page query and the count query; binds $1..$4.
/// `ILIKE` folds case per the database collation (see `VehicleFilter`).
const VEHICLE_FILTER: &str = "($1::TEXT IS NULL OR brand ILIKE $1) \
     AND ($2::TEXT IS NULL OR model ILIKE $2) \
     AND ($3::INTEGER IS NULL OR year = $3) \
     AND ($4::BOOLEAN IS NULL OR sold = $4)";

const REQUEST_COLUMNS: &str =
    "id, vehicle_id, buyer_id, vendor_id, status, request_date, response_date";

const SALE_COLUMNS: &str =
    "id, vehicle_id, vendor_id, buyer_id, price, sale_date, created_at, updated_at";

/// PostgreSQL-backed marketplace repository
#[derive(Clone)]
pub struct PgMarketplaceRepository {
    pool: PgPool,
}

impl PgMarketplaceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Round-trip to the database, for readiness checks.
    pub async fn ping(&self) -> MarketplaceResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

/// `%needle%` with LIKE metacharacters escaped.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Explain why a conditional `UPDATE ... WHERE status = 'PENDING'` hit no row.
async fn request_conflict<'e, E>(executor: E, request_id: &PurchaseRequestId) -> MarketplaceError
where
    E: Executor<'e, Database = Postgres>,
{
    let status = sqlx::query_scalar::<_, String>("SELECT status FROM purchase_requests WHERE id = $1")
        .bind(request_id.as_uuid())
        .fetch_optional(executor)
        .await;

    match status {
        Ok(Some(code)) => match PurchaseRequestStatus::from_code(&code) {
            Some(status) => MarketplaceError::RequestNotPending(status),
            None => MarketplaceError::Internal(format!("Unknown purchase request status: {code}")),
        },
        Ok(None) => MarketplaceError::PurchaseRequestNotFound,
        Err(e) => MarketplaceError::Database(e),
    }
}

/// Explain why a conditional `UPDATE ... WHERE sold = FALSE` hit no row.
async fn vehicle_conflict<'e, E>(executor: E, vehicle_id: &VehicleId) -> MarketplaceError
where
    E: Executor<'e, Database = Postgres>,
{
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM vehicles WHERE id = $1)")
        .bind(vehicle_id.as_uuid())
        .fetch_one(executor)
        .await;

    match exists {
        Ok(true) => MarketplaceError::VehicleAlreadySold,
        Ok(false) => MarketplaceError::VehicleNotFound,
        Err(e) => MarketplaceError::Database(e),
    }
}

/// Mark the vehicle sold and insert the sale inside `tx`.
async fn insert_sale_marking_sold(
    tx: &mut sqlx::PgConnection,
    sale: &Sale,
) -> MarketplaceResult<()> {
    let marked = sqlx::query(
        "UPDATE vehicles SET sold = TRUE, updated_at = $2 WHERE id = $1 AND sold = FALSE",
    )
    .bind(sale.vehicle_id.as_uuid())
    .bind(sale.created_at)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if marked == 0 {
        return Err(vehicle_conflict(&mut *tx, &sale.vehicle_id).await);
    }

    sqlx::query(
        r#"
        INSERT INTO sales (
            id,
            vehicle_id,
            vendor_id,
            buyer_id,
            price,
            sale_date,
            created_at,
            updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(sale.id.as_uuid())
    .bind(sale.vehicle_id.as_uuid())
    .bind(sale.vendor_id.as_uuid())
    .bind(sale.buyer_id.as_uuid())
    .bind(sale.price.amount())
    .bind(sale.sale_date)
    .bind(sale.created_at)
    .bind(sale.updated_at)
    .execute(&mut *tx)
    .await
    .map_err(|e| match violated_constraint(&e) {
        Some(ONE_SALE_PER_VEHICLE) => MarketplaceError::VehicleAlreadySold,
        _ => MarketplaceError::Database(e),
    })?;

    Ok(())
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgMarketplaceRepository {
    async fn create(&self, user: &User) -> MarketplaceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id,
                name,
                email,
                password_hash,
                role,
                phone_number,
                cpf,
                date_of_birth,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(user.password.as_phc_string())
        .bind(user.role.code())
        .bind(&user.phone_number)
        .bind(&user.cpf)
        .bind(user.date_of_birth)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some(USERS_EMAIL_KEY) => MarketplaceError::EmailTaken,
            _ => MarketplaceError::Database(e),
        })?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> MarketplaceResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> MarketplaceResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> MarketplaceResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn list(&self) -> MarketplaceResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn update(&self, user: &User) -> MarketplaceResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE users SET
                name = $2,
                email = $3,
                updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some(USERS_EMAIL_KEY) => MarketplaceError::EmailTaken,
            _ => MarketplaceError::Database(e),
        })?
        .rows_affected();

        if updated == 0 {
            return Err(MarketplaceError::UserNotFound);
        }
        Ok(())
    }

    async fn delete(&self, user_id: &UserId) -> MarketplaceResult<bool> {
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    MarketplaceError::InvalidState(
                        "User is still referenced by listings or transactions".to_string(),
                    )
                } else {
                    MarketplaceError::Database(e)
                }
            })?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Vehicle Repository Implementation
// ============================================================================

impl VehicleRepository for PgMarketplaceRepository {
    async fn create(&self, vehicle: &Vehicle) -> MarketplaceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO vehicles (
                id,
                vendor_id,
                brand,
                model,
                year,
                color,
                price,
                vehicle_type,
                photo_urls,
                sold,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(vehicle.id.as_uuid())
        .bind(vehicle.vendor_id.as_uuid())
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(&vehicle.color)
        .bind(vehicle.price.amount())
        .bind(&vehicle.vehicle_type)
        .bind(&vehicle.photo_urls)
        .bind(vehicle.sold)
        .bind(vehicle.created_at)
        .bind(vehicle.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, vehicle_id: &VehicleId) -> MarketplaceResult<Option<Vehicle>> {
        let sql = format!("SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE id = $1");
        let row = sqlx::query_as::<_, VehicleRow>(&sql)
            .bind(vehicle_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(VehicleRow::into_vehicle))
    }

    async fn search(
        &self,
        filter: &VehicleFilter,
        page: PageRequest,
    ) -> MarketplaceResult<Page<Vehicle>> {
        let brand = filter.brand.as_deref().map(like_pattern);
        let model = filter.model.as_deref().map(like_pattern);

        let count_sql = format!("SELECT COUNT(*) FROM vehicles WHERE {VEHICLE_FILTER}");
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(&brand)
            .bind(&model)
            .bind(filter.year)
            .bind(filter.sold)
            .fetch_one(&self.pool)
            .await?;

        let page_sql = format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE {VEHICLE_FILTER} \
             ORDER BY created_at DESC, id DESC LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, VehicleRow>(&page_sql)
            .bind(&brand)
            .bind(&model)
            .bind(filter.year)
            .bind(filter.sold)
            .bind(i64::from(page.size()))
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        let items = rows.into_iter().map(VehicleRow::into_vehicle).collect();
        Ok(Page::new(items, page, u64::try_from(total).unwrap_or(0)))
    }

    async fn update(&self, vehicle: &Vehicle) -> MarketplaceResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE vehicles SET
                brand = $2,
                model = $3,
                year = $4,
                color = $5,
                price = $6,
                vehicle_type = $7,
                photo_urls = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(vehicle.id.as_uuid())
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(&vehicle.color)
        .bind(vehicle.price.amount())
        .bind(&vehicle.vehicle_type)
        .bind(&vehicle.photo_urls)
        .bind(vehicle.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(MarketplaceError::VehicleNotFound);
        }
        Ok(())
    }

    async fn mark_sold(&self, vehicle_id: &VehicleId) -> MarketplaceResult<bool> {
        let marked = sqlx::query(
            "UPDATE vehicles SET sold = TRUE, updated_at = $2 WHERE id = $1 AND sold = FALSE",
        )
        .bind(vehicle_id.as_uuid())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(marked > 0)
    }

    async fn delete(&self, vehicle_id: &VehicleId) -> MarketplaceResult<bool> {
        // purchase_requests rows go with it (ON DELETE CASCADE)
        let deleted = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(vehicle_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    MarketplaceError::InvalidState("Vehicle is referenced by a sale".to_string())
                } else {
                    MarketplaceError::Database(e)
                }
            })?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Purchase Request Repository Implementation
// ============================================================================

impl PurchaseRequestRepository for PgMarketplaceRepository {
    async fn create(&self, request: &PurchaseRequest) -> MarketplaceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO purchase_requests (
                id,
                vehicle_id,
                buyer_id,
                vendor_id,
                status,
                request_date,
                response_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(request.id.as_uuid())
        .bind(request.vehicle_id.as_uuid())
        .bind(request.buyer_id.as_uuid())
        .bind(request.vendor_id.as_uuid())
        .bind(request.status.code())
        .bind(request.request_date)
        .bind(request.response_date)
        .execute(&self.pool)
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some(ONE_PENDING_PER_VEHICLE) => MarketplaceError::PendingRequestExists,
            _ => MarketplaceError::Database(e),
        })?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        request_id: &PurchaseRequestId,
    ) -> MarketplaceResult<Option<PurchaseRequest>> {
        let sql = format!("SELECT {REQUEST_COLUMNS} FROM purchase_requests WHERE id = $1");
        let row = sqlx::query_as::<_, PurchaseRequestRow>(&sql)
            .bind(request_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(PurchaseRequestRow::into_request).transpose()
    }

    async fn find_pending_by_vehicle(
        &self,
        vehicle_id: &VehicleId,
    ) -> MarketplaceResult<Option<PurchaseRequest>> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM purchase_requests \
             WHERE vehicle_id = $1 AND status = 'PENDING'"
        );
        let row = sqlx::query_as::<_, PurchaseRequestRow>(&sql)
            .bind(vehicle_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(PurchaseRequestRow::into_request).transpose()
    }

    async fn list_by_buyer(&self, buyer_id: &UserId) -> MarketplaceResult<Vec<PurchaseRequest>> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM purchase_requests \
             WHERE buyer_id = $1 ORDER BY request_date DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, PurchaseRequestRow>(&sql)
            .bind(buyer_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(PurchaseRequestRow::into_request).collect()
    }

    async fn list_by_vendor(
        &self,
        vendor_id: &UserId,
    ) -> MarketplaceResult<Vec<PurchaseRequest>> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM purchase_requests \
             WHERE vendor_id = $1 ORDER BY request_date DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, PurchaseRequestRow>(&sql)
            .bind(vendor_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(PurchaseRequestRow::into_request).collect()
    }

    async fn record_denial(&self, request: &PurchaseRequest) -> MarketplaceResult<()> {
        let answered = sqlx::query(
            r#"
            UPDATE purchase_requests SET
                status = $2,
                response_date = $3
            WHERE id = $1 AND status = 'PENDING'
            "#,
        )
        .bind(request.id.as_uuid())
        .bind(request.status.code())
        .bind(request.response_date)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if answered == 0 {
            return Err(request_conflict(&self.pool, &request.id).await);
        }
        Ok(())
    }

    async fn commit_acceptance(
        &self,
        request: &PurchaseRequest,
        sale: &Sale,
    ) -> MarketplaceResult<()> {
        let mut tx = self.pool.begin().await?;

        let answered = sqlx::query(
            r#"
            UPDATE purchase_requests SET
                status = $2,
                response_date = $3
            WHERE id = $1 AND status = 'PENDING'
            "#,
        )
        .bind(request.id.as_uuid())
        .bind(request.status.code())
        .bind(request.response_date)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if answered == 0 {
            return Err(request_conflict(&mut *tx, &request.id).await);
        }

        insert_sale_marking_sold(&mut tx, sale).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, request_id: &PurchaseRequestId) -> MarketplaceResult<bool> {
        let deleted = sqlx::query("DELETE FROM purchase_requests WHERE id = $1")
            .bind(request_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Sale Repository Implementation
// ============================================================================

impl SaleRepository for PgMarketplaceRepository {
    async fn create_marking_sold(&self, sale: &Sale) -> MarketplaceResult<()> {
        let mut tx = self.pool.begin().await?;
        insert_sale_marking_sold(&mut tx, sale).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, sale_id: &SaleId) -> MarketplaceResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = $1");
        let row = sqlx::query_as::<_, SaleRow>(&sql)
            .bind(sale_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(SaleRow::into_sale))
    }

    async fn list(&self) -> MarketplaceResult<Vec<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales ORDER BY sale_date DESC, id DESC");
        let rows = sqlx::query_as::<_, SaleRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(SaleRow::into_sale).collect())
    }

    async fn list_by_vendor(&self, vendor_id: &UserId) -> MarketplaceResult<Vec<Sale>> {
        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE vendor_id = $1 ORDER BY sale_date DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, SaleRow>(&sql)
            .bind(vendor_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(SaleRow::into_sale).collect())
    }

    async fn update(&self, sale: &Sale) -> MarketplaceResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE sales SET
                buyer_id = $2,
                price = $3,
                updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(sale.id.as_uuid())
        .bind(sale.buyer_id.as_uuid())
        .bind(sale.price.amount())
        .bind(sale.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(MarketplaceError::SaleNotFound);
        }
        Ok(())
    }

    async fn delete_releasing_vehicle(&self, sale: &Sale) -> MarketplaceResult<bool> {
        let mut tx = self.pool.begin().await?;

        let vehicle_id =
            sqlx::query_scalar::<_, Uuid>("DELETE FROM sales WHERE id = $1 RETURNING vehicle_id")
                .bind(sale.id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;

        let Some(vehicle_id) = vehicle_id else {
            return Ok(false);
        };

        sqlx::query("UPDATE vehicles SET sold = FALSE, updated_at = $2 WHERE id = $1")
            .bind(vehicle_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    phone_number: Option<String>,
    cpf: Option<String>,
    date_of_birth: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> MarketplaceResult<User> {
        let role = UserRole::from_code(&self.role)
            .ok_or_else(|| MarketplaceError::Internal(format!("Unknown user role: {}", self.role)))?;

        Ok(User {
            id: UserId::from_uuid(self.id),
            name: self.name,
            email: Email::from_db(self.email),
            password: UserPassword::from_db(self.password_hash)?,
            role,
            phone_number: self.phone_number,
            cpf: self.cpf,
            date_of_birth: self.date_of_birth,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct VehicleRow {
    id: Uuid,
    vendor_id: Uuid,
    brand: String,
    model: String,
    year: i32,
    color: String,
    price: Decimal,
    vehicle_type: String,
    photo_urls: Vec<String>,
    sold: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl VehicleRow {
    fn into_vehicle(self) -> Vehicle {
        Vehicle {
            id: VehicleId::from_uuid(self.id),
            vendor_id: UserId::from_uuid(self.vendor_id),
            brand: self.brand,
            model: self.model,
            year: self.year,
            color: self.color,
            price: Price::from_db(self.price),
            vehicle_type: self.vehicle_type,
            photo_urls: self.photo_urls,
            sold: self.sold,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PurchaseRequestRow {
    id: Uuid,
    vehicle_id: Uuid,
    buyer_id: Uuid,
    vendor_id: Uuid,
    status: String,
    request_date: DateTime<Utc>,
    response_date: Option<DateTime<Utc>>,
}

impl PurchaseRequestRow {
    fn into_request(self) -> MarketplaceResult<PurchaseRequest> {
        let status = PurchaseRequestStatus::from_code(&self.status).ok_or_else(|| {
            MarketplaceError::Internal(format!("Unknown purchase request status: {}", self.status))
        })?;

        Ok(PurchaseRequest {
            id: PurchaseRequestId::from_uuid(self.id),
            vehicle_id: VehicleId::from_uuid(self.vehicle_id),
            buyer_id: UserId::from_uuid(self.buyer_id),
            vendor_id: UserId::from_uuid(self.vendor_id),
            status,
            request_date: self.request_date,
            response_date: self.response_date,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SaleRow {
    id: Uuid,
    vehicle_id: Uuid,
    vendor_id: Uuid,
    buyer_id: Uuid,
    price: Decimal,
    sale_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SaleRow {
    fn into_sale(self) -> Sale {
        Sale {
            id: SaleId::from_uuid(self.id),
            vehicle_id: VehicleId::from_uuid(self.vehicle_id),
            vendor_id: UserId::from_uuid(self.vendor_id),
            buyer_id: UserId::from_uuid(self.buyer_id),
            price: Price::from_db(self.price),
            sale_date: self.sale_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
