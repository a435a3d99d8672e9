use serde::Serialize;

use super::error::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Result<Self, FilterError> {
        if value.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(FilterError::InvalidOrder(value.to_string()))
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// A closed set of sortable columns. Only `column()` output ever reaches SQL.
pub trait SortColumn: Sized + Copy + Send + Sync + 'static {
    fn parse(value: &str) -> Option<Self>;

    /// Column name as accepted in the `sortBy` query parameter
    fn as_str(&self) -> &'static str;

    /// Qualified SQL expression to order by
    fn column(&self) -> &'static str;

    /// Unique column appended after `column()` so equal values page stably
    fn tie_breaker() -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlumniSort {
    Id,
    Nama,
    Email,
    TahunLulus,
    CreatedAt,
}

impl SortColumn for AlumniSort {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "id" => Some(AlumniSort::Id),
            "nama" => Some(AlumniSort::Nama),
            "email" => Some(AlumniSort::Email),
            "tahun_lulus" => Some(AlumniSort::TahunLulus),
            "created_at" => Some(AlumniSort::CreatedAt),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            AlumniSort::Id => "id",
            AlumniSort::Nama => "nama",
            AlumniSort::Email => "email",
            AlumniSort::TahunLulus => "tahun_lulus",
            AlumniSort::CreatedAt => "created_at",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            AlumniSort::Id => "a.id",
            AlumniSort::Nama => "a.nama",
            AlumniSort::Email => "a.email",
            AlumniSort::TahunLulus => "a.tahun_lulus",
            AlumniSort::CreatedAt => "a.created_at",
        }
    }

    fn tie_breaker() -> &'static str {
        "a.id"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PekerjaanSort {
    Id,
    NamaPerusahaan,
    PosisiJabatan,
    TanggalMulaiKerja,
    CreatedAt,
    UpdatedAt,
}

impl SortColumn for PekerjaanSort {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "id" => Some(PekerjaanSort::Id),
            "nama_perusahaan" => Some(PekerjaanSort::NamaPerusahaan),
            "posisi_jabatan" => Some(PekerjaanSort::PosisiJabatan),
            "tanggal_mulai_kerja" => Some(PekerjaanSort::TanggalMulaiKerja),
            "created_at" => Some(PekerjaanSort::CreatedAt),
            "updated_at" => Some(PekerjaanSort::UpdatedAt),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            PekerjaanSort::Id => "id",
            PekerjaanSort::NamaPerusahaan => "nama_perusahaan",
            PekerjaanSort::PosisiJabatan => "posisi_jabatan",
            PekerjaanSort::TanggalMulaiKerja => "tanggal_mulai_kerja",
            PekerjaanSort::CreatedAt => "created_at",
            PekerjaanSort::UpdatedAt => "updated_at",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            PekerjaanSort::Id => "p.id",
            PekerjaanSort::NamaPerusahaan => "p.nama_perusahaan",
            PekerjaanSort::PosisiJabatan => "p.posisi_jabatan",
            PekerjaanSort::TanggalMulaiKerja => "p.tanggal_mulai_kerja",
            PekerjaanSort::CreatedAt => "p.created_at",
            PekerjaanSort::UpdatedAt => "p.updated_at",
        }
    }

    fn tie_breaker() -> &'static str {
        "p.id"
    }
}
