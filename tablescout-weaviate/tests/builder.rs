use tablescout_weaviate::{Vectorizer, WeaviateIndexError, WeaviateSchemaIndex, DEFAULT_CLASS_NAME};

#[test]
fn builder_defaults_class_name() {
    let index = WeaviateSchemaIndex::builder()
        .base_url("http://localhost:8080")
        .build()
        .unwrap();
    assert_eq!(index.class_name(), DEFAULT_CLASS_NAME);
    assert_eq!(index.vectorizer(), Vectorizer::None);
}

#[test]
fn builder_requires_base_url() {
    let err = WeaviateSchemaIndex::builder()
        .class_name("TableSchema")
        .build()
        .unwrap_err();
    assert!(matches!(err, WeaviateIndexError::MissingBaseUrl));

    let err = WeaviateSchemaIndex::builder()
        .base_url("  \t")
        .build()
        .unwrap_err();
    assert!(matches!(err, WeaviateIndexError::EmptyBaseUrl));
}

#[test]
fn builder_validates_class_name() {
    let err = WeaviateSchemaIndex::builder()
        .base_url("http://localhost:8080")
        .class_name(" ")
        .build()
        .unwrap_err();
    assert!(matches!(err, WeaviateIndexError::EmptyClassName));

    let err = WeaviateSchemaIndex::builder()
        .base_url("http://localhost:8080")
        .class_name("tableSchema")
        .build()
        .unwrap_err();
    assert!(matches!(err, WeaviateIndexError::InvalidClassName { .. }));

    let err = WeaviateSchemaIndex::builder()
        .base_url("http://localhost:8080")
        .class_name("Table-Schema")
        .build()
        .unwrap_err();
    assert!(matches!(err, WeaviateIndexError::InvalidClassName { .. }));
}

#[test]
fn builder_rejects_alpha_out_of_range() {
    let err = WeaviateSchemaIndex::builder()
        .base_url("http://localhost:8080")
        .alpha(1.5)
        .build()
        .unwrap_err();
    assert!(matches!(err, WeaviateIndexError::InvalidConfig(_)));
}

#[test]
fn debug_redacts_api_key() {
    let index = WeaviateSchemaIndex::builder()
        .base_url("https://foo.cloud.weaviate.io")
        .api_key("secret-key")
        .build()
        .unwrap();
    let debug = format!("{index:?}");
    assert!(debug.contains("<redacted>"));
    assert!(!debug.contains("secret-key"));
}

#[test]
fn vectorizer_parses_module_names() {
    assert_eq!("none".parse::<Vectorizer>().unwrap(), Vectorizer::None);
    assert_eq!(
        "text2vec-openai".parse::<Vectorizer>().unwrap(),
        Vectorizer::Text2VecOpenAi
    );
    assert!("text2vec-cohere".parse::<Vectorizer>().is_err());
}
