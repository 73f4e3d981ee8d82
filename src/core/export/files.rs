//! Derived file set of one record
//!
//! Every exported person directory holds a handful of small text files whose
//! *names* carry the attribute values (so a directory listing is readable on
//! its own), one file per phone number, and `ALL.json` with the full record.

use crate::core::normalize::{normalize_phones, sanitize_name, NO_DATA};
use crate::domain::record::fields;
use crate::domain::{Record, RecordError};

/// Name of the full-record file
pub const ALL_JSON: &str = "ALL.json";

const TEXT_EXTENSION: &str = ".txt";

/// One file to be written into the export target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedFile {
    /// File name, already sanitized
    pub name: String,

    /// UTF-8 contents
    pub contents: String,
}

/// The files derived from one record, unique by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedFileSet {
    files: Vec<DerivedFile>,
}

impl DerivedFileSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the full set for `record`
    ///
    /// Attribute files (`username`, `address`, `CityID <id>`, `direction`,
    /// `city`, `Lic#<number>`) are named after their sanitized value and hold
    /// the raw value, `"No data"` when absent. Each phone original gets a
    /// file, as does each canonical variant not already among the originals.
    pub fn for_record(record: &Record) -> Result<Self, RecordError> {
        let mut set = Self::new();

        let username = record.username();
        set.push_attribute("", username.as_deref());

        set.push_attribute("", record.profile_field(fields::ADDRESS).as_deref());
        set.push_attribute("CityID ", record.profile_field(fields::CITY_ID).as_deref());
        set.push_attribute("", record.profile_field(fields::DIRECTION).as_deref());
        set.push_attribute("", record.profile_field(fields::CITY).as_deref());
        set.push_attribute(
            "Lic#",
            record.profile_field(fields::LICENSE_NUMBER).as_deref(),
        );

        let phones = normalize_phones(record.profile_field(fields::PHONE).as_deref());
        for original in &phones.originals {
            set.push_text(original, original);
        }
        for variant in phones.distinct_variants() {
            set.push_text(variant, variant);
        }

        set.push(ALL_JSON.to_string(), record.to_pretty_json()?);
        Ok(set)
    }

    /// Add `<prefix><value>.txt` containing the value
    fn push_attribute(&mut self, prefix: &str, value: Option<&str>) {
        let value = value.unwrap_or(NO_DATA);
        self.push_text(&format!("{prefix}{value}"), value);
    }

    fn push_text(&mut self, label: &str, contents: &str) {
        let name = format!("{}{TEXT_EXTENSION}", sanitize_name(label));
        self.push(name, contents.to_string());
    }

    /// Add a file, keeping names unique
    ///
    /// An identical (name, contents) pair is dropped. A name already taken by
    /// different contents gets a ` (n)` suffix before its extension.
    pub fn push(&mut self, name: String, contents: String) {
        if self
            .files
            .iter()
            .any(|f| f.name == name && f.contents == contents)
        {
            return;
        }

        let name = if self.contains(&name) {
            self.next_free_name(&name)
        } else {
            name
        };

        self.files.push(DerivedFile { name, contents });
    }

    fn next_free_name(&self, name: &str) -> String {
        let (stem, ext) = split_extension(name);
        let mut n = 2;
        loop {
            let candidate = format!("{stem} ({n}){ext}");
            if !self.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// True if a file named `name` is in the set
    pub fn contains(&self, name: &str) -> bool {
        self.files.iter().any(|f| f.name == name)
    }

    /// Look up a file by name
    pub fn get(&self, name: &str) -> Option<&DerivedFile> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DerivedFile> {
        self.files.iter()
    }
}

impl IntoIterator for DerivedFileSet {
    type Item = DerivedFile;
    type IntoIter = std::vec::IntoIter<DerivedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Record {
        Record::new(json!({
            "username": "alisher_k",
            "profile": {
                "user_id": "17",
                "fio": "Karimov Alisher",
                "organization_name": "MCHJ \"ABC Trading\" filial",
                "region": "Toshkent",
                "address": "Chilonzor 5/12",
                "phone": "+998 90 123-45-67, 12345",
                "city_id": 26,
                "direction": "Civil law",
                "city": "Tashkent",
                "license_number": "AB-0042"
            }
        }))
    }

    fn names(set: &DerivedFileSet) -> Vec<&str> {
        set.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_full_record_file_set() {
        let set = DerivedFileSet::for_record(&sample()).unwrap();

        assert_eq!(
            names(&set),
            vec![
                "alisher_k.txt",
                "Chilonzor 5_12.txt",
                "CityID 26.txt",
                "Civil law.txt",
                "Tashkent.txt",
                "Lic#AB-0042.txt",
                "+998 90 123-45-67.txt",
                "12345.txt",
                "901234567.txt",
                "ALL.json",
            ]
        );
        assert_eq!(set.get("Chilonzor 5_12.txt").unwrap().contents, "Chilonzor 5/12");
        assert_eq!(set.get("CityID 26.txt").unwrap().contents, "26");
        assert_eq!(set.get("Lic#AB-0042.txt").unwrap().contents, "AB-0042");
        assert_eq!(set.get("901234567.txt").unwrap().contents, "901234567");
    }

    #[test]
    fn test_all_json_is_full_record() {
        let record = sample();
        let set = DerivedFileSet::for_record(&record).unwrap();

        let all = set.get(ALL_JSON).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&all.contents).unwrap();
        assert_eq!(&parsed, record.as_value());
    }

    #[test]
    fn test_missing_attributes_use_placeholder() {
        let record = Record::new(json!({ "profile": { "user_id": "5" } }));
        let set = DerivedFileSet::for_record(&record).unwrap();

        // username, address, direction, city and phone all collapse to one file.
        assert_eq!(
            names(&set),
            vec!["No data.txt", "CityID No data.txt", "Lic#No data.txt", "ALL.json"]
        );
        assert_eq!(set.get("CityID No data.txt").unwrap().contents, NO_DATA);
    }

    #[test]
    fn test_name_collision_with_different_contents_is_suffixed() {
        let mut set = DerivedFileSet::new();
        set.push("a_b.txt".to_string(), "a/b".to_string());
        set.push("a_b.txt".to_string(), "a:b".to_string());
        set.push("a_b.txt".to_string(), "a?b".to_string());
        set.push("a_b.txt".to_string(), "a/b".to_string());

        assert_eq!(names(&set), vec!["a_b.txt", "a_b (2).txt", "a_b (3).txt"]);
        assert_eq!(set.get("a_b (2).txt").unwrap().contents, "a:b");
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("x.txt"), ("x", ".txt"));
        assert_eq!(split_extension("noext"), ("noext", ""));
        assert_eq!(split_extension(".hidden"), (".hidden", ""));
    }
}
