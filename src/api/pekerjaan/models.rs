use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::db::models::PekerjaanFields;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

fn validate_date(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok() {
        Ok(())
    } else {
        let mut err = ValidationError::new("date_format");
        err.message = Some("Date must be formatted as YYYY-MM-DD".into());
        Err(err)
    }
}

/// Parse an optional calendar date; an empty string means "not supplied"
pub fn parse_optional_date(value: Option<&str>, field: &str) -> Result<Option<NaiveDate>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, DATE_FORMAT)
            .map(Some)
            .map_err(|_| format!("{} must be formatted as YYYY-MM-DD", field)),
    }
}

/// Descriptive fields shared by create and update requests
#[derive(Deserialize, Serialize, Debug, Default, Clone, Validate)]
pub struct PekerjaanInput {
    #[validate(length(max = 255, message = "nama_perusahaan must be at most 255 characters"))]
    pub nama_perusahaan: Option<String>,
    #[validate(length(max = 255, message = "posisi_jabatan must be at most 255 characters"))]
    pub posisi_jabatan: Option<String>,
    #[validate(length(max = 255, message = "bidang_industri must be at most 255 characters"))]
    pub bidang_industri: Option<String>,
    #[validate(length(max = 255, message = "lokasi_kerja must be at most 255 characters"))]
    pub lokasi_kerja: Option<String>,
    #[validate(length(max = 100, message = "gaji_range must be at most 100 characters"))]
    pub gaji_range: Option<String>,
    #[validate(custom(function = "validate_date"))]
    pub tanggal_mulai_kerja: Option<String>,
    #[validate(custom(function = "validate_date"))]
    pub tanggal_selesai_kerja: Option<String>,
    #[validate(length(max = 50, message = "status_pekerjaan must be at most 50 characters"))]
    pub status_pekerjaan: Option<String>,
    pub deskripsi_pekerjaan: Option<String>,
}

impl PekerjaanInput {
    /// Convert to store fields, parsing dates and checking their order
    pub fn into_fields(self) -> Result<PekerjaanFields, String> {
        let start = parse_optional_date(self.tanggal_mulai_kerja.as_deref(), "tanggal_mulai_kerja")?;
        let end = parse_optional_date(self.tanggal_selesai_kerja.as_deref(), "tanggal_selesai_kerja")?;

        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err("tanggal_mulai_kerja must not be after tanggal_selesai_kerja".to_string());
            }
        }

        Ok(PekerjaanFields {
            nama_perusahaan: self.nama_perusahaan,
            posisi_jabatan: self.posisi_jabatan,
            bidang_industri: self.bidang_industri,
            lokasi_kerja: self.lokasi_kerja,
            gaji_range: self.gaji_range,
            tanggal_mulai_kerja: start,
            tanggal_selesai_kerja: end,
            status_pekerjaan: self.status_pekerjaan,
            deskripsi_pekerjaan: self.deskripsi_pekerjaan,
        })
    }
}

/// Body of `POST /pekerjaan`
///
/// `alumni_id` is only honoured for admins. There is no `created_by` field:
/// attribution always comes from the caller's token.
#[derive(Deserialize, Serialize, Debug, Default, Clone, Validate)]
pub struct CreatePekerjaanRequest {
    pub alumni_id: Option<i32>,
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: PekerjaanInput,
}

/// Body of `PUT /pekerjaan/{id}`. Replaces every descriptive field.
#[derive(Deserialize, Serialize, Debug, Default, Clone, Validate)]
pub struct UpdatePekerjaanRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub fields: PekerjaanInput,
}
