use super::fixtures::*;
use crate::*;

#[test]
fn export_without_syntax_leaves_head_open() {
    let generator = FeatureGenerator::new();
    let exporter = TableExporter::new(&generator, Granularity::Sentences);
    let mut sentence = windless_night(false);

    let table = exporter.export(&mut sentence);
    assert_eq!(
        lines(&table),
        vec![
            "1\tÖö\töö\tS\tS\tsg|nom\t_\txxx\t_\t_",
            "2\toli\tolema\tV\tV\tindic|impf|ps3|sg|ps|af\t_\txxx\t_\t_",
            "3\ttäiesti\ttäiesti\tD\tD\t_\t_\txxx\t_\t_",
            "4\ttuuletu\ttuuletu\tA\tA\tpos|sg|nom\t_\txxx\t_\t_",
            "5\t.\t.\tZ\tZ\tFst\t_\txxx\t_\t_",
        ]
    );
}

#[test]
fn export_with_syntax_writes_one_based_heads() {
    let generator = FeatureGenerator::new();
    let exporter = TableExporter::new(&generator, Granularity::Sentences);
    let mut sentence = windless_night(true);

    let table = exporter.export_with_syntax(&mut sentence).unwrap();
    let rows = lines(&table);
    assert_eq!(rows.len(), 5);
    assert!(rows[0].ends_with("\t2\t@SUBJ\t_\t_"), "{}", rows[0]);
    assert!(rows[1].ends_with("\t0\tROOT\t_\t_"), "{}", rows[1]);
    assert!(rows[2].ends_with("\t4\t@ADVL\t_\t_"), "{}", rows[2]);
    assert!(table.ends_with("_\t_\n"));
}

#[test]
fn exported_table_reads_back_identically() {
    let generator = FeatureGenerator::new()
        .with_ambiguous_pos(true)
        .with_rule(ClauseBoundaryFeatures);
    let exporter = TableExporter::new(&generator, Granularity::Sentences);

    let ambiguous = Token::new(
        "s",
        1,
        "tee",
        vec![Analysis::new("tegema", "V", "o"), Analysis::new("tee", "S", "sg nom")],
    )
    .unwrap()
    .with_edge(DependencyEdge::root("@FMV"));
    let mut sentence = Sentence::new(
        "s",
        vec![
            word("New York", "New York", "H", "sg nom").with_edge(DependencyEdge::new(Head::Index(1), "@SUBJ")),
            ambiguous.with_clause_mark(ClauseAnnotation::Boundary),
            word("?", "", "Z", "").with_edge(DependencyEdge::new(Head::Index(1), "@Punc")),
        ],
    );

    let first = exporter.export_with_syntax(&mut sentence).unwrap();
    let chunks = read_chunks(&lines(&first)).unwrap();
    assert_eq!(chunks.len(), 1);

    let mut reread = rows_to_sentence("s", &chunks[0]).unwrap();
    let plain = FeatureGenerator::new();
    let second = TableExporter::new(&plain, Granularity::Sentences)
        .export_with_syntax(&mut reread)
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(
        lines(&first)[1],
        "2\ttee\ttee\tS\tS_V\tsg|nom|clb\t0\tROOT\t_\t_"
    );
    assert_eq!(lines(&first)[2], "3\t?\t??\tZ\tZ\t_\t2\t@Punc\t_\t_");
}

#[test]
fn clause_export_renumbers_each_clause() {
    let generator = FeatureGenerator::new();
    let exporter = TableExporter::new(&generator, Granularity::Clauses);
    let mut sentence = embedded_relative();

    let table = exporter.export_with_syntax(&mut sentence).unwrap();
    let heads: Vec<(String, String, String)> = lines(&table)
        .iter()
        .map(|line| {
            if line.is_empty() {
                return (String::new(), String::new(), String::new());
            }
            let columns: Vec<&str> = line.split('\t').collect();
            (columns[0].to_string(), columns[1].to_string(), columns[6].to_string())
        })
        .collect();

    let expected = [
        ("1", "Mees", "2"),
        ("2", "istus", "0"),
        ("3", ".", "2"),
        ("", "", ""),
        ("1", ",", "3"),
        ("2", "kes", "3"),
        ("3", "tuli", "0"),
        ("4", ",", "3"),
    ];
    let expected: Vec<(String, String, String)> = expected
        .iter()
        .map(|(a, b, c)| (a.to_string(), b.to_string(), c.to_string()))
        .collect();
    assert_eq!(heads, expected);
}

#[test]
fn clause_export_without_syntax_keeps_sentence_untouched() {
    let generator = FeatureGenerator::new();
    let exporter = TableExporter::new(&generator, Granularity::Clauses);
    let mut sentence = embedded_relative();
    let before = sentence.heads();

    let blocks = exporter.rows(&mut sentence);
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].len(), 3);
    assert_eq!(blocks[1].len(), 4);
    assert!(blocks.iter().flatten().all(|row| row.head.is_none() && row.deprel == "xxx"));
    assert_eq!(sentence.heads(), before);
}
