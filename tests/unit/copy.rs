use super::*;

struct Failing(CopyGenerationError);

impl CopyGenerator for Failing {
    fn generate(&self, _source_image: &Path) -> Result<GeneratedCopy, CopyGenerationError> {
        Err(self.0.clone())
    }
}

#[test]
fn parses_title_and_description_lines() {
    let reply = "Here you go!\nTitle: Lost Key\nDescription: A gripping tale filled with mystery. A world waiting to be explored.\n";
    let copy = parse_copy_reply(reply).unwrap();
    assert_eq!(copy.title, "Lost Key");
    assert_eq!(
        copy.description,
        "A gripping tale filled with mystery. A world waiting to be explored."
    );
}

#[test]
fn missing_line_falls_back_per_field() {
    let copy = parse_copy_reply("Title: Dark Sea").unwrap();
    assert_eq!(copy.title, "Dark Sea");
    assert_eq!(copy.description, FALLBACK_DESCRIPTION);

    let copy = parse_copy_reply("Description: Short and sweet.").unwrap();
    assert_eq!(copy.title, FALLBACK_TITLE);
}

#[test]
fn reply_without_fields_is_malformed() {
    let err = parse_copy_reply("I cannot help with that.").unwrap_err();
    assert!(matches!(err, CopyGenerationError::MalformedReply(_)));
}

#[test]
fn failures_degrade_to_fallback_copy() {
    for err in [
        CopyGenerationError::Unavailable("network down".to_string()),
        CopyGenerationError::MalformedReply("garbage".to_string()),
    ] {
        let copy = generate_copy_or_fallback(&Failing(err), Path::new("cover.jpg"));
        assert_eq!(copy, GeneratedCopy::fallback());
        assert_eq!(copy.title, "Untitled");
        assert_eq!(copy.description, "No description available.");
    }
}

#[test]
fn reply_file_generator_reads_and_parses() {
    let path = std::env::temp_dir().join(format!("postergen_reply_{}.txt", std::process::id()));
    std::fs::write(&path, "Title: Lost Key\nDescription: Find it.").unwrap();
    let copy = ReplyFileCopy { path: path.clone() }
        .generate(Path::new("cover.jpg"))
        .unwrap();
    assert_eq!(copy, GeneratedCopy::new("Lost Key", "Find it."));

    let _ = std::fs::remove_file(&path);
    let err = ReplyFileCopy { path }
        .generate(Path::new("cover.jpg"))
        .unwrap_err();
    assert_eq!(err.kind(), "unavailable");
}

#[test]
fn field_values_cover_both_fields() {
    let values = GeneratedCopy::new("T", "D").field_values();
    assert_eq!(values.get(&TextField::Title).map(String::as_str), Some("T"));
    assert_eq!(values.get(&TextField::Description).map(String::as_str), Some("D"));
}
