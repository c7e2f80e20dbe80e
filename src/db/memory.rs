use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::db::models::{
    DeletedInfo, ListQuery, NewPekerjaan, PekerjaanFields, PekerjaanRow, SortField, SortOrder,
};
use crate::db::pekerjaan_repository::PekerjaanStore;

/// In-process store used by tests. Mirrors the conditional-write contract of
/// the PostgreSQL adapter.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i32,
    rows: Vec<PekerjaanRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn owned_by(row: &PekerjaanRow, owner: Option<&str>) -> bool {
        owner.map_or(true, |o| row.created_by.as_deref() == Some(o))
    }

    fn set_deleted(&self, id: i32, from: bool, owner: Option<&str>) -> bool {
        let mut inner = self.inner.lock().unwrap();
        match inner
            .rows
            .iter_mut()
            .find(|r| r.id == id && r.is_deleted == from && Self::owned_by(r, owner))
        {
            Some(row) => {
                row.is_deleted = !from;
                row.updated_at = Utc::now().naive_utc();
                true
            }
            None => false,
        }
    }
}

fn matches_search(row: &PekerjaanRow, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    [&row.nama_perusahaan, &row.posisi_jabatan]
        .iter()
        .any(|field| field.as_deref().is_some_and(|v| v.to_lowercase().contains(&needle)))
}

#[async_trait]
impl PekerjaanStore for MemoryStore {
    async fn list(&self, query: &ListQuery) -> Result<Vec<PekerjaanRow>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<PekerjaanRow> = inner
            .rows
            .iter()
            .filter(|r| !r.is_deleted && matches_search(r, &query.search))
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            let ord = match query.sort_by {
                SortField::Id => a.id.cmp(&b.id),
                SortField::NamaPerusahaan => a.nama_perusahaan.cmp(&b.nama_perusahaan),
                SortField::PosisiJabatan => a.posisi_jabatan.cmp(&b.posisi_jabatan),
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            };
            let ord = match query.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            };
            ord.then(a.id.cmp(&b.id))
        });

        Ok(rows
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn get_active(&self, id: i32) -> Result<Option<PekerjaanRow>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.rows.iter().find(|r| r.id == id && !r.is_deleted).cloned())
    }

    async fn get_from_trash(&self, id: i32) -> Result<Option<PekerjaanRow>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.rows.iter().find(|r| r.id == id && r.is_deleted).cloned())
    }

    async fn list_by_alumni(&self, alumni_id: i32) -> Result<Vec<PekerjaanRow>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<PekerjaanRow> = inner
            .rows
            .iter()
            .filter(|r| r.alumni_id == alumni_id && !r.is_deleted)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn list_trash(&self, owner: Option<&str>) -> Result<Vec<PekerjaanRow>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<PekerjaanRow> = inner
            .rows
            .iter()
            .filter(|r| r.is_deleted && Self::owned_by(r, owner))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn create(&self, record: &NewPekerjaan) -> Result<PekerjaanRow, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let now = Utc::now().naive_utc();
        let fields = record.fields.clone();
        let row = PekerjaanRow {
            id: inner.next_id,
            alumni_id: record.alumni_id,
            nama_perusahaan: fields.nama_perusahaan,
            posisi_jabatan: fields.posisi_jabatan,
            bidang_industri: fields.bidang_industri,
            lokasi_kerja: fields.lokasi_kerja,
            gaji_range: fields.gaji_range,
            tanggal_mulai_kerja: fields.tanggal_mulai_kerja,
            tanggal_selesai_kerja: fields.tanggal_selesai_kerja,
            status_pekerjaan: fields.status_pekerjaan,
            deskripsi_pekerjaan: fields.deskripsi_pekerjaan,
            created_at: now,
            updated_at: now,
            is_deleted: false,
            created_by: Some(record.created_by.clone()),
        };
        inner.rows.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        id: i32,
        fields: &PekerjaanFields,
    ) -> Result<Option<PekerjaanRow>, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        let Some(row) = inner.rows.iter_mut().find(|r| r.id == id && !r.is_deleted) else {
            return Ok(None);
        };
        let fields = fields.clone();
        row.nama_perusahaan = fields.nama_perusahaan;
        row.posisi_jabatan = fields.posisi_jabatan;
        row.bidang_industri = fields.bidang_industri;
        row.lokasi_kerja = fields.lokasi_kerja;
        row.gaji_range = fields.gaji_range;
        row.tanggal_mulai_kerja = fields.tanggal_mulai_kerja;
        row.tanggal_selesai_kerja = fields.tanggal_selesai_kerja;
        row.status_pekerjaan = fields.status_pekerjaan;
        row.deskripsi_pekerjaan = fields.deskripsi_pekerjaan;
        row.updated_at = Utc::now().naive_utc();
        Ok(Some(row.clone()))
    }

    async fn soft_delete(&self, id: i32, owner: Option<&str>) -> Result<bool, sqlx::Error> {
        Ok(self.set_deleted(id, false, owner))
    }

    async fn restore(&self, id: i32, owner: Option<&str>) -> Result<bool, sqlx::Error> {
        Ok(self.set_deleted(id, true, owner))
    }

    async fn hard_delete(&self, id: i32, owner: Option<&str>) -> Result<bool, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.rows.len();
        inner
            .rows
            .retain(|r| !(r.id == id && r.is_deleted && Self::owned_by(r, owner)));
        Ok(inner.rows.len() < before)
    }

    async fn get_deleted_info(&self, id: i32) -> Result<Option<DeletedInfo>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.rows.iter().find(|r| r.id == id).map(|r| DeletedInfo {
            created_by: r.created_by.clone(),
            is_deleted: r.is_deleted,
        }))
    }
}

/// Store in which another writer always gets there first: every lifecycle
/// write is preceded by the same transition applied without an owner scope,
/// so the caller's guarded write matches nothing.
#[derive(Default)]
pub struct ContendedStore {
    pub base: MemoryStore,
}

impl ContendedStore {
    pub fn new() -> Self {
        Self {
            base: MemoryStore::new(),
        }
    }
}

#[async_trait]
impl PekerjaanStore for ContendedStore {
    async fn list(&self, query: &ListQuery) -> Result<Vec<PekerjaanRow>, sqlx::Error> {
        self.base.list(query).await
    }

    async fn get_active(&self, id: i32) -> Result<Option<PekerjaanRow>, sqlx::Error> {
        self.base.get_active(id).await
    }

    async fn get_from_trash(&self, id: i32) -> Result<Option<PekerjaanRow>, sqlx::Error> {
        self.base.get_from_trash(id).await
    }

    async fn list_by_alumni(&self, alumni_id: i32) -> Result<Vec<PekerjaanRow>, sqlx::Error> {
        self.base.list_by_alumni(alumni_id).await
    }

    async fn list_trash(&self, owner: Option<&str>) -> Result<Vec<PekerjaanRow>, sqlx::Error> {
        self.base.list_trash(owner).await
    }

    async fn create(&self, record: &NewPekerjaan) -> Result<PekerjaanRow, sqlx::Error> {
        self.base.create(record).await
    }

    async fn update(
        &self,
        id: i32,
        fields: &PekerjaanFields,
    ) -> Result<Option<PekerjaanRow>, sqlx::Error> {
        self.base.update(id, fields).await
    }

    async fn soft_delete(&self, id: i32, owner: Option<&str>) -> Result<bool, sqlx::Error> {
        self.base.soft_delete(id, None).await?;
        self.base.soft_delete(id, owner).await
    }

    async fn restore(&self, id: i32, owner: Option<&str>) -> Result<bool, sqlx::Error> {
        self.base.restore(id, None).await?;
        self.base.restore(id, owner).await
    }

    async fn hard_delete(&self, id: i32, owner: Option<&str>) -> Result<bool, sqlx::Error> {
        self.base.hard_delete(id, None).await?;
        self.base.hard_delete(id, owner).await
    }

    async fn get_deleted_info(&self, id: i32) -> Result<Option<DeletedInfo>, sqlx::Error> {
        self.base.get_deleted_info(id).await
    }
}
