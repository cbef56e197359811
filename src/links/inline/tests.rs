use super::*;
use crate::knowledge::KnowledgeEntity;

fn linker(titles: &[(&str, &str)]) -> InlineLinker {
    InlineLinker::try_from_titles(titles.iter().copied()).expect("linker should build")
}

fn joined(segments: &[LinkedSegment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}

#[test]
fn longest_title_wins() {
    let linker = linker(&[("Plan", "plan"), ("Second Five Year Plan", "fyp-2")]);
    let segments = linker.link("the Second Five Year Plan began");

    assert_eq!(
        segments,
        vec![
            LinkedSegment::plain("the "),
            LinkedSegment::link("Second Five Year Plan", "fyp-2"),
            LinkedSegment::plain(" began"),
        ]
    );
}

#[test]
fn shorter_title_still_links_elsewhere() {
    let linker = linker(&[("Plan", "plan"), ("Second Five Year Plan", "fyp-2")]);
    let segments = linker.link("A plan, then the Second Five Year Plan.");

    let links: Vec<(&str, Option<&str>)> = segments
        .iter()
        .filter(|s| s.is_link())
        .map(|s| (s.text.as_str(), s.link_id.as_deref()))
        .collect();
    assert_eq!(
        links,
        vec![("plan", Some("plan")), ("Second Five Year Plan", Some("fyp-2"))]
    );
}

#[test]
fn matching_is_case_insensitive_and_keeps_original_case() {
    let linker = linker(&[("Green Revolution", "green-rev")]);
    let segments = linker.link("The GREEN revolution transformed Punjab");

    assert_eq!(segments[1], LinkedSegment::link("GREEN revolution", "green-rev"));
}

#[test]
fn concatenation_reproduces_input() {
    let linker = linker(&[
        ("Plan", "plan"),
        ("Plassey", "plassey"),
        ("a", "letter-a"),
        ("C++ (language)", "cpp"),
        ("Śaka Era", "saka"),
    ]);

    let inputs = [
        "",
        "no titles here? well, a few",
        "Plassey Plan plan PLAN",
        "Learning C++ (language) is fun",
        "The Śaka Era began in 78 CE.",
        "naïve café — Plan\n\tPlassey!",
        "aaaa",
    ];

    for input in inputs {
        let segments = linker.link(input);
        assert_eq!(joined(&segments), input);
        assert!(segments.iter().all(|s| !s.text.is_empty()));
    }
}

#[test]
fn regex_metacharacters_are_literal() {
    let linker = linker(&[("C++ (language)", "cpp"), ("a.b", "dot")]);

    let segments = linker.link("axb and a.b and C++ (language)");
    let ids: Vec<&str> = segments.iter().filter_map(|s| s.link_id.as_deref()).collect();
    assert_eq!(ids, vec!["dot", "cpp"]);
}

#[test]
fn short_titles_match_inside_words() {
    let linker = linker(&[("Art", "art")]);
    let segments = linker.link("Bhartiya");

    assert_eq!(
        segments,
        vec![
            LinkedSegment::plain("Bh"),
            LinkedSegment::link("art", "art"),
            LinkedSegment::plain("iya"),
        ]
    );
}

#[test]
fn empty_titles_are_ignored() {
    let linker = linker(&[("", "blank"), ("   ", "spaces")]);
    assert_eq!(linker.keyword_count(), 0);
    assert_eq!(linker.link("anything"), vec![LinkedSegment::plain("anything")]);
}

#[test]
fn empty_text_yields_no_segments() {
    let linker = linker(&[("Plan", "plan")]);
    assert!(linker.link("").is_empty());
}

#[test]
fn adjacent_plain_text_is_merged() {
    let linker = linker(&[("Plan", "plan")]);
    let segments = linker.link("no match");
    assert_eq!(segments, vec![LinkedSegment::plain("no match")]);
}

#[test]
fn builds_from_collection() {
    let collection: KnowledgeCollection = [
        KnowledgeEntity::new("rourkela", "Rourkela Steel Plant"),
        KnowledgeEntity::new("bhilai", "Bhilai Steel Plant"),
    ]
    .into_iter()
    .collect();

    let segments = link_content("Bhilai Steel Plant and Rourkela Steel Plant", &collection);
    let ids: Vec<&str> = segments.iter().filter_map(|s| s.link_id.as_deref()).collect();
    assert_eq!(ids, vec!["bhilai", "rourkela"]);
}

#[test]
fn serializes_like_the_frontend_expects() {
    let json = serde_json::to_value(vec![
        LinkedSegment::plain("see "),
        LinkedSegment::link("Plan", "plan"),
    ])
    .expect("segments serialize");
    assert_eq!(
        json,
        serde_json::json!([{"text": "see "}, {"text": "Plan", "linkId": "plan"}])
    );
}

fn numbered_titles(count: usize) -> Vec<(String, String)> {
    (0..count)
        .map(|i| (format!("Topic {} of the constitution", i), format!("topic-{}", i)))
        .collect()
}

#[test]
fn links_against_ten_thousand_titles() {
    let titles = numbered_titles(10_000);
    let linker = InlineLinker::try_from_titles(
        titles.iter().map(|(title, id)| (title.as_str(), id.as_str())),
    )
    .expect("large title sets should compile");

    assert_eq!(linker.keyword_count(), 10_000);
    let segments = linker.link("See Topic 9999 of the Constitution for details");
    assert_eq!(
        segments,
        vec![
            LinkedSegment::plain("See "),
            LinkedSegment::link("Topic 9999 of the Constitution", "topic-9999"),
            LinkedSegment::plain(" for details"),
        ]
    );
}

#[test]
fn uncompilable_pattern_leaves_text_plain() {
    let titles = numbered_titles(200);
    let pairs = || titles.iter().map(|(title, id)| (title.as_str(), id.as_str()));

    let linker = InlineLinker::with_size_limit(pairs(), 64);
    let text = "Topic 1 of the constitution applies";
    assert_eq!(linker.link(text), vec![LinkedSegment::plain(text)]);

    let keywords = collect_keywords(pairs());
    assert!(matches!(
        compile_pattern(&keywords, 64),
        Err(PortalError::Linker(_))
    ));
}
