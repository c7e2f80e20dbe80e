use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;

use crate::db::models::{DeletedInfo, ListQuery, NewPekerjaan, PekerjaanFields, PekerjaanRow};

const COLUMNS: &str = "id, alumni_id, nama_perusahaan, posisi_jabatan, bidang_industri, lokasi_kerja, \
     gaji_range, tanggal_mulai_kerja, tanggal_selesai_kerja, status_pekerjaan, \
     deskripsi_pekerjaan, created_at, updated_at, is_deleted, created_by";

/// Storage operations behind the job-record lifecycle
///
/// Every state-changing method is a single conditional write. `owner` narrows
/// the write to rows whose `created_by` matches; `None` means unrestricted.
/// A `false`/`None` return means no row was in the expected state.
#[async_trait]
pub trait PekerjaanStore: Send + Sync {
    /// Active records matching the search, ordered and paginated
    async fn list(&self, query: &ListQuery) -> Result<Vec<PekerjaanRow>, sqlx::Error>;

    async fn get_active(&self, id: i32) -> Result<Option<PekerjaanRow>, sqlx::Error>;

    async fn get_from_trash(&self, id: i32) -> Result<Option<PekerjaanRow>, sqlx::Error>;

    /// Active records of one alumni, newest first
    async fn list_by_alumni(&self, alumni_id: i32) -> Result<Vec<PekerjaanRow>, sqlx::Error>;

    /// Deleted records, optionally only those created by `owner`
    async fn list_trash(&self, owner: Option<&str>) -> Result<Vec<PekerjaanRow>, sqlx::Error>;

    async fn create(&self, record: &NewPekerjaan) -> Result<PekerjaanRow, sqlx::Error>;

    /// Replace the descriptive fields of an active record
    async fn update(
        &self,
        id: i32,
        fields: &PekerjaanFields,
    ) -> Result<Option<PekerjaanRow>, sqlx::Error>;

    /// Active -> Deleted
    async fn soft_delete(&self, id: i32, owner: Option<&str>) -> Result<bool, sqlx::Error>;

    /// Deleted -> Active
    async fn restore(&self, id: i32, owner: Option<&str>) -> Result<bool, sqlx::Error>;

    /// Deleted -> Purged
    async fn hard_delete(&self, id: i32, owner: Option<&str>) -> Result<bool, sqlx::Error>;

    async fn get_deleted_info(&self, id: i32) -> Result<Option<DeletedInfo>, sqlx::Error>;
}

/// PostgreSQL adapter over the `pekerjaan` table
pub struct PgPekerjaanRepository {
    pool: Pool<Postgres>,
}

impl PgPekerjaanRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        id: i32,
        is_deleted: bool,
    ) -> Result<Option<PekerjaanRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pekerjaan WHERE id = $1 AND is_deleted = $2");
        sqlx::query_as::<_, PekerjaanRow>(&query)
            .bind(id)
            .bind(is_deleted)
            .fetch_optional(&self.pool)
            .await
    }

    /// Flip `is_deleted` from `from` to `!from` for one row
    async fn set_deleted(
        &self,
        id: i32,
        from: bool,
        owner: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE pekerjaan
            SET is_deleted = NOT is_deleted, updated_at = NOW()
            WHERE id = $1 AND is_deleted = $2 AND ($3::TEXT IS NULL OR created_by = $3)
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl PekerjaanStore for PgPekerjaanRepository {
    async fn list(&self, query: &ListQuery) -> Result<Vec<PekerjaanRow>, sqlx::Error> {
        let column = query.sort_by.column();
        let order = query.order.keyword();
        let tiebreak = if column == "id" { "" } else { ", id ASC" };

        let sql = format!(
            "SELECT {COLUMNS} FROM pekerjaan \
             WHERE is_deleted = false \
               AND ($1 = '' OR nama_perusahaan ILIKE $2 OR posisi_jabatan ILIKE $2) \
             ORDER BY {column} {order}{tiebreak} \
             LIMIT $3 OFFSET $4"
        );
        debug!(
            "Listing pekerjaan: search={:?}, sort={} {}, limit={}, offset={}",
            query.search, column, order, query.limit, query.offset
        );

        sqlx::query_as::<_, PekerjaanRow>(&sql)
            .bind(&query.search)
            .bind(format!("%{}%", query.search))
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_active(&self, id: i32) -> Result<Option<PekerjaanRow>, sqlx::Error> {
        self.fetch_one_where(id, false).await
    }

    async fn get_from_trash(&self, id: i32) -> Result<Option<PekerjaanRow>, sqlx::Error> {
        self.fetch_one_where(id, true).await
    }

    async fn list_by_alumni(&self, alumni_id: i32) -> Result<Vec<PekerjaanRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pekerjaan \
             WHERE alumni_id = $1 AND is_deleted = false \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, PekerjaanRow>(&query)
            .bind(alumni_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn list_trash(&self, owner: Option<&str>) -> Result<Vec<PekerjaanRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pekerjaan \
             WHERE is_deleted = true AND ($1::TEXT IS NULL OR created_by = $1) \
             ORDER BY updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, PekerjaanRow>(&query)
            .bind(owner)
            .fetch_all(&self.pool)
            .await
    }

    async fn create(&self, record: &NewPekerjaan) -> Result<PekerjaanRow, sqlx::Error> {
        debug!(
            "Creating pekerjaan: alumni_id={}, created_by={}",
            record.alumni_id, record.created_by
        );

        let fields = &record.fields;
        let query = format!(
            "INSERT INTO pekerjaan (alumni_id, nama_perusahaan, posisi_jabatan, bidang_industri, \
                 lokasi_kerja, gaji_range, tanggal_mulai_kerja, tanggal_selesai_kerja, \
                 status_pekerjaan, deskripsi_pekerjaan, created_at, updated_at, is_deleted, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW(), false, $11) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PekerjaanRow>(&query)
            .bind(record.alumni_id)
            .bind(&fields.nama_perusahaan)
            .bind(&fields.posisi_jabatan)
            .bind(&fields.bidang_industri)
            .bind(&fields.lokasi_kerja)
            .bind(&fields.gaji_range)
            .bind(fields.tanggal_mulai_kerja)
            .bind(fields.tanggal_selesai_kerja)
            .bind(&fields.status_pekerjaan)
            .bind(&fields.deskripsi_pekerjaan)
            .bind(&record.created_by)
            .fetch_one(&self.pool)
            .await?;

        debug!("Pekerjaan created with id={}", row.id);
        Ok(row)
    }

    async fn update(
        &self,
        id: i32,
        fields: &PekerjaanFields,
    ) -> Result<Option<PekerjaanRow>, sqlx::Error> {
        debug!("Updating pekerjaan id={}", id);

        let query = format!(
            "UPDATE pekerjaan \
             SET nama_perusahaan = $1, posisi_jabatan = $2, bidang_industri = $3, lokasi_kerja = $4, \
                 gaji_range = $5, tanggal_mulai_kerja = $6, tanggal_selesai_kerja = $7, \
                 status_pekerjaan = $8, deskripsi_pekerjaan = $9, updated_at = NOW() \
             WHERE id = $10 AND is_deleted = false \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PekerjaanRow>(&query)
            .bind(&fields.nama_perusahaan)
            .bind(&fields.posisi_jabatan)
            .bind(&fields.bidang_industri)
            .bind(&fields.lokasi_kerja)
            .bind(&fields.gaji_range)
            .bind(fields.tanggal_mulai_kerja)
            .bind(fields.tanggal_selesai_kerja)
            .bind(&fields.status_pekerjaan)
            .bind(&fields.deskripsi_pekerjaan)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn soft_delete(&self, id: i32, owner: Option<&str>) -> Result<bool, sqlx::Error> {
        debug!("Soft deleting pekerjaan id={}, owner={:?}", id, owner);
        self.set_deleted(id, false, owner).await
    }

    async fn restore(&self, id: i32, owner: Option<&str>) -> Result<bool, sqlx::Error> {
        debug!("Restoring pekerjaan id={}, owner={:?}", id, owner);
        self.set_deleted(id, true, owner).await
    }

    async fn hard_delete(&self, id: i32, owner: Option<&str>) -> Result<bool, sqlx::Error> {
        debug!("Hard deleting pekerjaan id={}, owner={:?}", id, owner);

        let result = sqlx::query(
            r#"
            DELETE FROM pekerjaan
            WHERE id = $1 AND is_deleted = true AND ($2::TEXT IS NULL OR created_by = $2)
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn get_deleted_info(&self, id: i32) -> Result<Option<DeletedInfo>, sqlx::Error> {
        sqlx::query_as::<_, DeletedInfo>(
            "SELECT created_by, is_deleted FROM pekerjaan WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}
