use serde_json::{Map, Value};

use super::DockerInfo;

pub const MESSAGE_KEY: &str = "message";
pub const DOCKER_KEY: &str = "docker";
pub const STREAM_KEY: &str = "stream";

/// The canonical form of one log line, keyed by field name in insertion order.
pub type Record = Map<String, Value>;

/// Builds the record for one log line.
///
/// A line holding a JSON object keeps all of its fields; anything else, including JSON arrays
/// and scalars, is wrapped under `message`. Either way `docker` and `stream` are set from the
/// line's origin and replace any fields of the same name.
pub fn normalize(data: &str, source: &str, docker: &DockerInfo) -> serde_json::Result<Record> {
    let mut record = match serde_json::from_str::<Value>(data) {
        Ok(Value::Object(fields)) => fields,
        _ => {
            let mut record = Record::new();
            record.insert(MESSAGE_KEY.to_owned(), Value::String(data.to_owned()));
            record
        }
    };

    record.insert(DOCKER_KEY.to_owned(), docker.to_value()?);
    record.insert(STREAM_KEY.to_owned(), Value::String(source.to_owned()));
    Ok(record)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use similar_asserts::assert_eq;

    use super::*;
    use crate::test_util::container;

    fn docker() -> DockerInfo {
        DockerInfo::from_container(&container("web", "abc123", "nginx", "host1"))
    }

    fn keys(record: &Record) -> Vec<&str> {
        record.keys().map(String::as_str).collect()
    }

    #[test]
    fn wraps_plain_text() {
        let record = normalize("hello world", "stdout", &docker()).unwrap();

        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"message":"hello world","docker":{"name":"web","id":"abc123","image":"nginx","hostname":"host1","service":""},"stream":"stdout"}"#
        );
    }

    #[test]
    fn merges_json_object() {
        let record =
            normalize(r#"{"level":"info","msg":"started"}"#, "stderr", &docker()).unwrap();

        assert_eq!(keys(&record), vec!["level", "msg", "docker", "stream"]);
        assert_eq!(record["level"], json!("info"));
        assert_eq!(record["msg"], json!("started"));
        assert_eq!(record["stream"], json!("stderr"));
        assert!(!record.contains_key(MESSAGE_KEY));
    }

    #[test]
    fn keeps_nested_values() {
        let record = normalize(
            r#"{"req":{"path":"/","status":200},"tags":["a","b"],"took":1.5,"ok":true,"none":null}"#,
            "stdout",
            &docker(),
        )
        .unwrap();

        assert_eq!(record["req"], json!({"path": "/", "status": 200}));
        assert_eq!(record["tags"], json!(["a", "b"]));
        assert_eq!(record["took"], json!(1.5));
        assert_eq!(record["ok"], json!(true));
        assert_eq!(record["none"], Value::Null);
    }

    #[test]
    fn origin_fields_overwrite_input() {
        let record = normalize(
            r#"{"docker":"spoofed","stream":"nowhere","message":"kept"}"#,
            "stdout",
            &docker(),
        )
        .unwrap();

        assert_eq!(keys(&record), vec!["docker", "stream", "message"]);
        assert_eq!(record[DOCKER_KEY], docker().to_value().unwrap());
        assert_eq!(record[STREAM_KEY], json!("stdout"));
        assert_eq!(record[MESSAGE_KEY], json!("kept"));
    }

    #[test]
    fn non_objects_are_wrapped() {
        for data in [
            r#"["a","b"]"#,
            "42",
            r#""quoted""#,
            "true",
            "null",
            r#"{"unterminated":"#,
            "{not json}",
            "",
        ] {
            let record = normalize(data, "stdout", &docker()).unwrap();

            assert_eq!(keys(&record), vec![MESSAGE_KEY, DOCKER_KEY, STREAM_KEY], "{data}");
            assert_eq!(record[MESSAGE_KEY], json!(data));
        }
    }

    #[test]
    fn surrounding_whitespace_still_decodes() {
        let record = normalize("  {\"level\":\"warn\"}\n", "stdout", &docker()).unwrap();

        assert_eq!(keys(&record), vec!["level", "docker", "stream"]);
    }
}
