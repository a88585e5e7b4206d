//! End-to-end recipe pipeline behavior over the public API

use hashforge::{create, DigestId, Recipe};

#[test]
fn test_double_sha256_of_abc() {
    let mut recipe = Recipe::new(&[DigestId::Sha256, DigestId::Sha256]).unwrap();
    let inner = create(DigestId::Sha256).compute_bytes(b"abc").unwrap();
    let expected = create(DigestId::Sha256).compute_bytes(&inner).unwrap();
    assert_eq!(recipe.compute_hash(b"abc").unwrap(), expected);
    // first stage alone is the plain digest
    assert_eq!(
        hex::encode(&inner),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn test_recipe_equals_right_fold_for_every_family() {
    let ids = [
        DigestId::Sha1,
        DigestId::QmhHuk384,
        DigestId::Groestl512,
        DigestId::Jh224,
        DigestId::Skein384,
        DigestId::Blake224,
    ];
    let mut recipe = Recipe::new(&ids).unwrap();
    let mut expected = b"pipeline input".to_vec();
    for id in ids {
        expected = create(id).compute_bytes(&expected).unwrap();
    }
    assert_eq!(recipe.compute_hash(b"pipeline input").unwrap(), expected);
    assert_eq!(recipe.output_bits(), 224);
}

#[test]
fn test_stage_width_flows_between_stages() {
    // a 512-bit stage feeding a 224-bit stage ends at 28 bytes
    let mut recipe = Recipe::new(&[DigestId::Blake512, DigestId::QmhHuk224]).unwrap();
    let out = recipe.compute_hash(b"width flow").unwrap();
    assert_eq!(out.len(), 28);
}

#[test]
fn test_empty_recipe_is_invalid_config() {
    let err = Recipe::new(&[]).unwrap_err();
    assert!(err.to_string().contains("Invalid configuration"));
}

#[test]
fn test_sources_and_slices_agree() {
    use hashforge::{MessageSource, ReaderSource, SliceSource};

    let data: Vec<u8> = (0u32..5000).map(|i| (i % 251) as u8).collect();
    for id in DigestId::ALL {
        let mut digest = create(id);
        let from_slice = digest.compute(&mut SliceSource::new(&data)).unwrap();
        let mut streamed = ReaderSource::new(std::io::Cursor::new(data.clone()));
        assert_eq!(streamed.len(), None);
        let from_stream = digest.compute(&mut streamed).unwrap();
        assert_eq!(from_slice, from_stream, "{}", id);
    }
}
