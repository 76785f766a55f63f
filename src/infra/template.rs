use std::fs;
use std::path::Path;
use tracing::info;

use crate::constants::{TEMPLATE_FILE_PREFIX, TEMPLATE_VERSION};
use crate::error::Result;
use crate::pipeline::processing::normalize::AliasRegistry;

/// Default file name, carrying the template version
pub fn template_file_name() -> String {
    format!("{}_{}.csv", TEMPLATE_FILE_PREFIX, TEMPLATE_VERSION)
}

/// Write the import template: a single header line with the canonical
/// header of every field, in table order. Returns the template version.
pub fn write_template(path: &Path, registry: &AliasRegistry) -> Result<&'static str> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let headers = registry.template_headers();
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&headers)?;
    writer.flush()?;

    info!(path = %path.display(), version = TEMPLATE_VERSION, columns = headers.len(), "Template written");
    Ok(TEMPLATE_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Field;

    #[test]
    fn test_template_headers_map_back_to_every_field() {
        let registry = AliasRegistry::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(template_file_name());

        let version = write_template(&path, &registry).unwrap();
        assert_eq!(version, TEMPLATE_VERSION);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .unwrap();
        let header = reader.records().next().unwrap().unwrap();
        let fields: Vec<Field> = header
            .iter()
            .map(|h| registry.field_for_header(h).unwrap())
            .collect();

        assert_eq!(fields, Field::ALL.to_vec());
    }

    #[test]
    fn test_file_name_carries_version() {
        assert!(template_file_name().contains(TEMPLATE_VERSION));
    }
}
