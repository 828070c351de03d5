//! Tabular export of the song chart (CSV / spreadsheet)
//!
//! Export always covers the full record set handed in by the caller; list
//! filters are not applied here.

use std::fmt;
use std::str::FromStr;

use rust_xlsxwriter::{Format, Workbook};

use crate::error::{Error, Result};
use crate::song::Song;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column order of every export
pub const COLUMNS: [&str; 12] = [
    "id",
    "melon_uid",
    "slug",
    "rank",
    "album_name",
    "name",
    "artist_name",
    "cover_url",
    "lyrics",
    "genre",
    "release_date",
    "like_count",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    /// Legacy name; produces the same bytes as `Xlsx`
    Xls,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx | ExportFormat::Xls => "application/vnd.ms-excel",
        }
    }

    pub fn filename(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "hottrack.csv",
            ExportFormat::Xlsx => "hottrack.xlsx",
            ExportFormat::Xls => "hottrack(97-2003v).xls",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            "xls" => Ok(ExportFormat::Xls),
            other => Err(Error::InvalidFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Xls => "xls",
        };
        f.write_str(name)
    }
}

/// Rendered export ready to be sent as an attachment
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: &'static str,
}

/// Export `songs` in the format named by `format`
pub fn export(songs: &[Song], format: &str) -> Result<ExportFile> {
    export_as(songs, format.parse()?)
}

/// Export `songs` in an already-parsed `format`
pub fn export_as(songs: &[Song], format: ExportFormat) -> Result<ExportFile> {
    let bytes = match format {
        ExportFormat::Csv => write_csv(songs)?,
        ExportFormat::Xlsx | ExportFormat::Xls => write_spreadsheet(songs)?,
    };

    Ok(ExportFile {
        bytes,
        content_type: format.content_type(),
        filename: format.filename(),
    })
}

fn row_values(song: &Song) -> [String; 12] {
    [
        song.id.map(|id| id.to_string()).unwrap_or_default(),
        song.melon_uid.clone(),
        song.slug.clone(),
        song.rank.to_string(),
        song.album_name.clone(),
        song.name.clone(),
        song.artist_name.clone(),
        song.cover_url.clone(),
        song.lyrics.clone(),
        song.genre.clone(),
        song.release_date.format("%Y-%m-%d").to_string(),
        song.like_count.to_string(),
    ]
}

/// UTF-8 CSV with BOM, header row, no index column
fn write_csv(songs: &[Song]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer
        .write_record(COLUMNS)
        .map_err(|e| Error::Export(e.to_string()))?;
    for song in songs {
        writer
            .write_record(row_values(song))
            .map_err(|e| Error::Export(e.to_string()))?;
    }
    writer.into_inner().map_err(|e| Error::Export(e.to_string()))
}

fn write_spreadsheet(songs: &[Song]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    {
        let worksheet = workbook.add_worksheet();
        for (col, name) in COLUMNS.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, *name, &header)
                .map_err(xlsx_error)?;
        }

        for (i, song) in songs.iter().enumerate() {
            let row = (i + 1) as u32;
            if let Some(id) = song.id {
                worksheet.write_number(row, 0, id as f64).map_err(xlsx_error)?;
            }
            worksheet.write_string(row, 1, &song.melon_uid).map_err(xlsx_error)?;
            worksheet.write_string(row, 2, &song.slug).map_err(xlsx_error)?;
            worksheet.write_number(row, 3, song.rank).map_err(xlsx_error)?;
            worksheet.write_string(row, 4, &song.album_name).map_err(xlsx_error)?;
            worksheet.write_string(row, 5, &song.name).map_err(xlsx_error)?;
            worksheet.write_string(row, 6, &song.artist_name).map_err(xlsx_error)?;
            worksheet.write_string(row, 7, &song.cover_url).map_err(xlsx_error)?;
            worksheet.write_string(row, 8, &song.lyrics).map_err(xlsx_error)?;
            worksheet.write_string(row, 9, &song.genre).map_err(xlsx_error)?;
            worksheet
                .write_string(row, 10, song.release_date.format("%Y-%m-%d").to_string())
                .map_err(xlsx_error)?;
            worksheet.write_number(row, 11, song.like_count).map_err(xlsx_error)?;
        }
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

fn xlsx_error(e: rust_xlsxwriter::XlsxError) -> Error {
    Error::Export(e.to_string())
}
