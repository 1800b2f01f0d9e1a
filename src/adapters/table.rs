use crate::domain::model::{InputRecord, OutputRecord};
use crate::utils::error::{EtlError, Result};

/// 輸出欄位固定為 place / country / identifier 的順序
pub const OUTPUT_HEADER: [&str; 3] = ["City", "Country", "WikidataID"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn column_index(headers: &csv::StringRecord, column: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| EtlError::MissingColumnError {
            column: column.to_string(),
        })
}

/// 解析輸入表格，回傳順序與檔案中的列一致
pub fn read_places(
    data: &[u8],
    path: &str,
    place_column: &str,
    country_column: &str,
    delimiter: u8,
) -> Result<Vec<InputRecord>> {
    // Excel 匯出的 CSV 常帶 BOM
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| EtlError::InputError {
            path: path.to_string(),
            message: format!("invalid header row: {}", e),
        })?
        .clone();

    let place_idx = column_index(&headers, place_column)?;
    let country_idx = column_index(&headers, country_column)?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = result.map_err(|e| EtlError::InputError {
            path: path.to_string(),
            message: format!("row {}: {}", i + 1, e),
        })?;

        records.push(InputRecord::new(
            row.get(place_idx).unwrap_or(""),
            row.get(country_idx).unwrap_or(""),
        ));
    }

    tracing::debug!("Parsed {} rows from {}", records.len(), path);
    Ok(records)
}

pub fn write_enriched(records: &[OutputRecord], path: &str, delimiter: u8) -> Result<Vec<u8>> {
    let output_error = |message: String| EtlError::OutputError {
        path: path.to_string(),
        message,
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer
        .write_record(OUTPUT_HEADER)
        .map_err(|e| output_error(e.to_string()))?;

    for record in records {
        writer
            .write_record([
                record.place.as_str(),
                record.country.as_str(),
                record.identifier.as_str(),
            ])
            .map_err(|e| output_error(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| output_error(e.to_string()))
}
