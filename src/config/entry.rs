use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::slot::StreamSlot;

/// One configuration parameter as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub parameter: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// One option of an enumerated parameter, parsed from `label:value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub label: String,
    pub value: String,
}

/// Configuration snapshot keyed by position, in the order the backend sent it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigSnapshot {
    entries: BTreeMap<usize, ConfigEntry>,
}

/// Entry of a write request. All four keys are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteEntry {
    pub parameter: String,
    pub description: String,
    pub comment: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_file_name: Option<String>,
    #[serde(flatten)]
    pub entries: BTreeMap<String, WriteEntry>,
}

impl ConfigEntry {
    pub fn new(parameter: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            value: value.into(),
            description: None,
            comment: None,
        }
    }

    /// Label shown next to the input.
    pub fn title(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => &self.parameter,
        }
    }

    /// Enumerated options, if the comment lists any. Paths are never enumerated.
    pub fn choices(&self) -> Option<Vec<Choice>> {
        if self.parameter.ends_with("path") {
            return None;
        }
        parse_choices(self.comment.as_deref()?)
    }
}

/// Parse `# (0:off,1:serial,2:file)` style comments.
pub fn parse_choices(comment: &str) -> Option<Vec<Choice>> {
    if !comment.contains(',') {
        return None;
    }
    let choices = comment
        .split(',')
        .map(|item| {
            item.chars()
                .filter(|c| !matches!(c, '#' | ' ' | '(' | ')'))
                .collect::<String>()
        })
        .filter(|item| !item.is_empty())
        .map(|item| match item.split_once(':') {
            Some((label, value)) => Choice {
                label: label.to_string(),
                value: value.to_string(),
            },
            None => Choice {
                label: item.clone(),
                value: item,
            },
        })
        .collect::<Vec<_>>();
    Some(choices)
}

impl ConfigSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry after the last ordinal.
    pub fn push(&mut self, entry: ConfigEntry) {
        let next = self.entries.keys().next_back().map_or(0, |k| k + 1);
        self.entries.insert(next, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigEntry> {
        self.entries.values()
    }

    pub fn get(&self, parameter: &str) -> Option<&ConfigEntry> {
        self.entries.values().find(|e| e.parameter == parameter)
    }

    pub fn value(&self, parameter: &str) -> Option<&str> {
        self.get(parameter).map(|e| e.value.as_str())
    }

    /// Update the value of an existing parameter. Returns false if absent.
    pub fn set_value(&mut self, parameter: &str, value: impl Into<String>) -> bool {
        match self.entries.values_mut().find(|e| e.parameter == parameter) {
            Some(entry) => {
                entry.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Slots that carry a `-path` parameter, in configuration order.
    pub fn stream_slots(&self) -> Vec<StreamSlot> {
        let mut slots = Vec::new();
        for entry in self.entries.values() {
            if let Some((slot, "path")) = StreamSlot::split_parameter(&entry.parameter)
                && !slots.contains(&slot)
            {
                slots.push(slot);
            }
        }
        slots
    }

    pub fn to_write_request(&self, config_file_name: Option<&str>) -> WriteRequest {
        let entries = self
            .entries
            .values()
            .map(|e| {
                (
                    e.parameter.clone(),
                    WriteEntry {
                        parameter: e.parameter.clone(),
                        description: e.description.clone().unwrap_or_default(),
                        comment: e.comment.clone().unwrap_or_default(),
                        value: e.value.clone(),
                    },
                )
            })
            .collect();
        WriteRequest {
            config_file_name: config_file_name.map(str::to_string),
            entries,
        }
    }
}

impl FromIterator<ConfigEntry> for ConfigSnapshot {
    fn from_iter<I: IntoIterator<Item = ConfigEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().enumerate().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn choices_from_comment() {
        let choices = parse_choices("# (0:off,1:serial,2:file,3:tcpsvr)").unwrap();
        assert_eq!(choices.len(), 4);
        assert_eq!(choices[0].label, "0");
        assert_eq!(choices[1].value, "serial");
        assert_eq!(choices[3].value, "tcpsvr");

        assert_eq!(parse_choices("baud rate"), None);
        let bare = parse_choices("rtcm2,rtcm3").unwrap();
        assert_eq!(bare[1].label, "rtcm3");
        assert_eq!(bare[1].value, "rtcm3");
    }

    #[test]
    fn path_entries_are_not_enumerated() {
        let mut e = ConfigEntry::new("inpstr1-path", "ttyMFD1:230400:8:n:1:off");
        e.comment = Some("a:b,c:d".into());
        assert_eq!(e.choices(), None);
        e.parameter = "inpstr1-type".into();
        assert_eq!(e.choices().map(|c| c.len()), Some(2));
    }

    #[test]
    fn title_prefers_description() {
        let mut e = ConfigEntry::new("pos1-elmask", "15");
        assert_eq!(e.title(), "pos1-elmask");
        e.description = Some("Elevation mask".into());
        assert_eq!(e.title(), "Elevation mask");
    }

    #[test]
    fn snapshot_from_backend_json() {
        let snap: ConfigSnapshot = serde_json::from_value(json!({
            "0": {"parameter": "inpstr1-type", "value": "serial", "comment": "(0:off,1:serial)"},
            "1": {"parameter": "inpstr1-path", "value": "ttyMFD1:230400:8:n:1:off"},
            "2": {"parameter": "pos1-elmask", "value": "15", "description": "Elevation mask"}
        }))
        .unwrap();
        assert_eq!(snap.len(), 3);
        assert_eq!(snap.value("inpstr1-type"), Some("serial"));
        assert_eq!(snap.stream_slots(), vec!["inpstr1".parse::<StreamSlot>().unwrap()]);
    }

    #[test]
    fn write_request_shape() {
        let mut snap: ConfigSnapshot = [
            ConfigEntry::new("outstr1-type", "off"),
            ConfigEntry::new("outstr1-path", ""),
        ]
        .into_iter()
        .collect();
        assert!(snap.set_value("outstr1-type", "file"));
        assert!(!snap.set_value("outstr9-type", "file"));

        let req = snap.to_write_request(Some("reach_single_default.conf"));
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["config_file_name"], "reach_single_default.conf");
        assert_eq!(v["outstr1-type"]["value"], "file");
        assert_eq!(v["outstr1-type"]["comment"], "");

        let back: WriteRequest = serde_json::from_value(v).unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn push_appends_after_last_ordinal() {
        let mut snap = ConfigSnapshot::new();
        snap.push(ConfigEntry::new("a", "1"));
        snap.push(ConfigEntry::new("b", "2"));
        let names: Vec<_> = snap.iter().map(|e| e.parameter.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
