use otlab_core::SourceRevisionInfo;
use otlab_revision::{
    ChainedRevisionSource, EnvRevisionSource, GitRevisionSource, RevisionSource,
};
use pretty_assertions::assert_eq;

#[test]
fn plain_directory_falls_back_to_environment() {
    let dir = tempfile::tempdir().unwrap();
    let source = ChainedRevisionSource::new()
        .then(GitRevisionSource::new(dir.path()))
        .then(EnvRevisionSource::from_pairs([
            ("DD_GIT_COMMIT_SHA", "9d1e7b0"),
            ("DD_GIT_REPOSITORY_URL", "git@github.com:acme/otel-lab.git"),
        ]));

    assert_eq!(
        source.capture(),
        SourceRevisionInfo::new("9d1e7b0", "github.com/acme/otel-lab")
    );
}

#[test]
fn nothing_available_is_fully_unknown() {
    let dir = tempfile::tempdir().unwrap();
    let source = ChainedRevisionSource::new()
        .then(GitRevisionSource::new(dir.path()))
        .then(EnvRevisionSource::from_pairs(Vec::<(String, String)>::new()));

    let info = source.capture();
    assert_eq!(info.commit_sha.as_str(), "unknown");
    assert_eq!(info.repository_url.as_str(), "unknown");
    assert!(!info.is_complete());
}

#[test]
fn whitespace_only_variables_are_unknown() {
    let info = EnvRevisionSource::from_pairs([
        ("DD_GIT_COMMIT_SHA", "  "),
        ("DD_GIT_REPOSITORY_URL", "\t"),
    ])
    .capture();
    assert_eq!(info, SourceRevisionInfo::unknown());
}
