use platform_util::UtilError;
use platform_util::core::{new_identifier, new_identifier_from};
use rand::RngCore;

struct ExhaustedSource;

impl RngCore for ExhaustedSource {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {}

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
        Err(rand::Error::new(std::io::Error::other("entropy exhausted")))
    }
}

fn is_canonical(id: &str) -> bool {
    let groups: Vec<&str> = id.split('-').collect();
    let lengths: Vec<usize> = groups.iter().map(|g| g.len()).collect();
    lengths == [8, 4, 4, 4, 12]
        && groups
            .iter()
            .all(|g| g.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)))
}

#[test]
fn test_identifier_layout() {
    for _ in 0..64 {
        let id = new_identifier().unwrap();
        assert_eq!(id.len(), 36);
        assert!(is_canonical(&id), "unexpected layout: {id}");
    }
}

#[test]
fn test_identifiers_differ() {
    assert_ne!(new_identifier().unwrap(), new_identifier().unwrap());
}

#[test]
fn test_failing_source_returns_error() {
    let err = new_identifier_from(&mut ExhaustedSource).unwrap_err();
    match err {
        UtilError::RandomnessError(msg) => assert!(msg.contains("entropy exhausted")),
        other => panic!("Unexpected error type: {other:?}"),
    }
}
