use super::*;
use std::path::PathBuf;

#[test]
fn test_stub_mode_without_model_path() {
    let reranker = CrossEncoderReranker::stub().unwrap();
    assert!(!reranker.is_model_loaded());
    assert!(!reranker.is_quantized());
}

#[test]
fn test_missing_model_files_fail_load() {
    let config = RerankerConfig::new("/nonexistent/reranker");
    let err = CrossEncoderReranker::load(config).unwrap_err();
    assert!(matches!(err, RerankerError::ModelLoadFailed { .. }));
}

#[test]
fn test_variant_resolution_under_models_root() {
    let config = RerankerConfig {
        models_root: Some(PathBuf::from("/models")),
        ..RerankerConfig::default()
    };
    assert_eq!(
        config.resolved_model_dir(),
        Some(PathBuf::from("/models/bge-reranker-base"))
    );

    let full = config.with_variant(ModelVariant::Full);
    assert_eq!(
        full.resolved_model_dir(),
        Some(PathBuf::from("/models/bge-reranker-v2-m3"))
    );
}

#[test]
fn test_explicit_path_wins_over_models_root() {
    let config = RerankerConfig {
        model_path: Some(PathBuf::from("/explicit")),
        models_root: Some(PathBuf::from("/models")),
        ..RerankerConfig::default()
    };
    assert_eq!(config.resolved_model_dir(), Some(PathBuf::from("/explicit")));
}

#[test]
fn test_empty_path_rejected() {
    let config = RerankerConfig {
        model_path: Some(PathBuf::new()),
        ..RerankerConfig::default()
    };
    assert!(matches!(
        CrossEncoderReranker::load(config),
        Err(RerankerError::InvalidConfig { .. })
    ));
}

#[test]
fn test_lexical_score_is_deterministic() {
    let reranker = CrossEncoderReranker::stub().unwrap();

    let a = reranker.score("mô hình học sâu", "tổng quan về mô hình học sâu").unwrap();
    let b = reranker.score("mô hình học sâu", "tổng quan về mô hình học sâu").unwrap();

    assert_eq!(a, b);
}

#[test]
fn test_lexical_score_prefers_overlap() {
    let reranker = CrossEncoderReranker::stub().unwrap();

    let on_topic = reranker
        .score("giá lúa gạo xuất khẩu", "báo cáo giá lúa gạo xuất khẩu năm nay")
        .unwrap();
    let off_topic = reranker
        .score("giá lúa gạo xuất khẩu", "hướng dẫn cài đặt phần mềm")
        .unwrap();

    assert!(on_topic > off_topic);
}

#[test]
fn test_lexical_score_bounds() {
    let reranker = CrossEncoderReranker::stub().unwrap();

    let score = reranker.score("any query at all", "completely unrelated words").unwrap();
    assert!((0.0..=1.0).contains(&score));

    // An empty query cannot match anything.
    assert_eq!(reranker.score("", "some passage").unwrap(), 0.0);
}

#[test]
fn test_score_pairs_preserves_order_and_length() {
    let reranker = CrossEncoderReranker::stub().unwrap();
    let passages: Vec<String> = vec![
        "thu hoạch lúa vụ đông xuân".into(),
        "lịch sử triều Nguyễn".into(),
        "kỹ thuật canh tác lúa nước".into(),
    ];

    let scores = reranker.score_pairs("canh tác lúa", &passages).unwrap();

    assert_eq!(scores.len(), passages.len());
    for (i, passage) in passages.iter().enumerate() {
        assert_eq!(scores[i], reranker.score("canh tác lúa", passage).unwrap());
    }
}

#[test]
fn test_score_pairs_empty_input() {
    let reranker = CrossEncoderReranker::stub().unwrap();
    assert!(reranker.score_pairs("q", &[]).unwrap().is_empty());
}
