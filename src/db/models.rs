use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use sqlx::FromRow;

/// Database representation of a job record with all fields
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct PekerjaanRow {
    pub id: i32,
    pub alumni_id: i32,
    pub nama_perusahaan: Option<String>,
    pub posisi_jabatan: Option<String>,
    pub bidang_industri: Option<String>,
    pub lokasi_kerja: Option<String>,
    pub gaji_range: Option<String>,
    pub tanggal_mulai_kerja: Option<NaiveDate>,
    pub tanggal_selesai_kerja: Option<NaiveDate>,
    pub status_pekerjaan: Option<String>,
    pub deskripsi_pekerjaan: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_deleted: bool,
    pub created_by: Option<String>,
}

/// Ownership and lifecycle state of a record, whichever partition it is in
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DeletedInfo {
    pub created_by: Option<String>,
    pub is_deleted: bool,
}

/// Descriptive fields that an update is allowed to replace
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PekerjaanFields {
    pub nama_perusahaan: Option<String>,
    pub posisi_jabatan: Option<String>,
    pub bidang_industri: Option<String>,
    pub lokasi_kerja: Option<String>,
    pub gaji_range: Option<String>,
    pub tanggal_mulai_kerja: Option<NaiveDate>,
    pub tanggal_selesai_kerja: Option<NaiveDate>,
    pub status_pekerjaan: Option<String>,
    pub deskripsi_pekerjaan: Option<String>,
}

/// A record ready to be inserted. `created_by` comes from the caller, never the client.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPekerjaan {
    pub alumni_id: i32,
    pub created_by: String,
    pub fields: PekerjaanFields,
}

/// Columns a listing may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Id,
    NamaPerusahaan,
    PosisiJabatan,
    CreatedAt,
}

impl SortField {
    /// Look up an allowed column name; anything else is rejected
    pub fn from_column(name: &str) -> Option<Self> {
        match name {
            "id" => Some(SortField::Id),
            "nama_perusahaan" => Some(SortField::NamaPerusahaan),
            "posisi_jabatan" => Some(SortField::PosisiJabatan),
            "created_at" => Some(SortField::CreatedAt),
            _ => None,
        }
    }

    /// Column text spliced into ORDER BY. This closed set is the only
    /// caller-influenced text that reaches the query string.
    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::NamaPerusahaan => "nama_perusahaan",
            SortField::PosisiJabatan => "posisi_jabatan",
            SortField::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// A sanitized listing request as the store consumes it
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub search: String,
    pub sort_by: SortField,
    pub order: SortOrder,
    pub limit: i64,
    pub offset: i64,
}
