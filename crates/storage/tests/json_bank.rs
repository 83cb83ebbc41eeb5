use std::io::Write;

use exam_storage::{JsonQuestionBank, QuestionBankRepository, StorageError};

const BANK: &str = r#"[
  {"id": 1, "pregunta": "¿Vía de administración sublingual?", "opciones": {"A": "Bajo la lengua", "B": "Intramuscular", "C": "Rectal"}, "respuesta_correcta": "A"},
  {"id": 2, "pregunta": "¿Temperatura de nevera?", "opciones": {"A": "2-8 ºC", "B": "15-25 ºC", "C": "-20 ºC"}, "respuesta_correcta": "A"},
  {"id": 3, "pregunta": "¿Qué es un estupefaciente?", "opciones": {"A": "Un antibiótico", "B": "Un psicótropo controlado", "C": "Un antiséptico"}, "respuesta_correcta": "B"}
]"#;

#[tokio::test]
async fn loads_bank_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(BANK.as_bytes()).unwrap();

    let repo = JsonQuestionBank::new(file.path());
    let bank = repo.load_bank().await.unwrap();

    assert_eq!(bank.len(), 3);
    assert_eq!(bank.records()[2].correct_text(), Some("Un psicótropo controlado"));
}

#[tokio::test]
async fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preguntas.json");

    let err = JsonQuestionBank::new(&path).load_bank().await.unwrap_err();

    match err {
        StorageError::NotFound { path: reported } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn invalid_record_fails_the_whole_load() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        br#"[{"prompt": "ok", "options": {"A": "x"}, "correct_option": "A"},
             {"prompt": "", "options": {"A": "x"}, "correct_option": "A"}]"#,
    )
    .unwrap();

    let err = JsonQuestionBank::new(file.path()).load_bank().await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidRecord { index: 1, .. }));
}
