use std::borrow::Cow;

use cardpng::card::{build_text_chunk, find_card, CHARA_KEYWORD};
use cardpng::png::{
  is_png_signature, png_crc_slice, read_chunks, write_chunks, ChunkType, CrcPolicy, PngChunk,
  ReadOptions, PNG_SIGNATURE,
};
use cardpng::{embed, embed_with, extract, CardPngError, CharacterCard, Lorebook, LorebookEntry};

/// A minimal structurally-valid PNG: IHDR, one IDAT, IEND. The pixel data is
/// nonsense, which is fine, because nothing in this crate decodes pixels.
fn tiny_png() -> Vec<u8> {
  let ihdr: [u8; 13] = [
    0, 0, 0, 1, // width 1
    0, 0, 0, 1, // height 1
    8, 2, 0, 0, 0, // bit depth 8, color type rgb, default methods
  ];
  let chunks = [
    PngChunk { ty: ChunkType::IHDR, data: Cow::Borrowed(&ihdr[..]) },
    PngChunk { ty: ChunkType::IDAT, data: Cow::Borrowed(&[1, 2, 3, 4, 5][..]) },
    PngChunk { ty: ChunkType::IEND, data: Cow::Borrowed(&[][..]) },
  ];
  write_chunks(&chunks)
}

fn sample_card() -> CharacterCard {
  CharacterCard {
    name: "Aria".to_string(),
    description: "A wandering bard.".to_string(),
    personality: "cheerful".to_string(),
    scenario: "a tavern".to_string(),
    first_mes: "Well met!".to_string(),
    mes_example: "<START>\nhello".to_string(),
    creator: Some("test".to_string()),
    tags: vec!["bard".to_string(), "music".to_string()],
    character_book: Some(Lorebook {
      name: Some("Aria's world".to_string()),
      entries: vec![LorebookEntry {
        keys: vec!["tavern".to_string()],
        content: "The tavern is called The Gilded Lute.".to_string(),
        insertion_order: 1,
        ..LorebookEntry::default()
      }],
      ..Lorebook::default()
    }),
    ..CharacterCard::default()
  }
}

#[test]
fn test_round_trip() {
  let image = tiny_png();
  let card = sample_card();
  let tagged = embed(&image, &card).unwrap();
  assert_eq!(extract(&tagged), Some(card));
  // the untouched base image has no card
  assert_eq!(extract(&image), None);
}

#[test]
fn test_embed_grows_by_exactly_one_chunk() {
  let image = tiny_png();
  let card = sample_card();
  let tagged = embed(&image, &card).unwrap();
  let before = read_chunks(&image, ReadOptions::default());
  let after = read_chunks(&tagged, ReadOptions::default());
  assert_eq!(after.len(), before.len() + 1);
  let added = after.iter().find(|c| c.ty == ChunkType::tEXt).unwrap();
  assert_eq!(tagged.len(), image.len() + 12 + added.data.len());
}

#[test]
fn test_idempotent_embedding_latest_card_wins() {
  let image = tiny_png();
  let card1 = CharacterCard { name: "Aria".to_string(), ..CharacterCard::default() };
  let card2 = CharacterCard { name: "Bea".to_string(), ..CharacterCard::default() };
  let once = embed(&image, &card1).unwrap();
  let twice = embed(&once, &card2).unwrap();
  let chunks = read_chunks(&twice, ReadOptions::default());
  let text_count = chunks.iter().filter(|c| c.ty == ChunkType::tEXt).count();
  assert_eq!(text_count, 1);
  assert_eq!(extract(&twice).unwrap().name, "Bea");
  // chunk count is stable across re-embeds
  assert_eq!(chunks.len(), read_chunks(&once, ReadOptions::default()).len());
}

#[test]
fn test_writer_output_crcs_verify() {
  let tagged = embed(&tiny_png(), &sample_card()).unwrap();
  // walk the raw layout by hand and recompute every CRC independently
  let mut offset = 8;
  let mut seen = 0;
  while offset < tagged.len() {
    let len = u32::from_be_bytes(tagged[offset..offset + 4].try_into().unwrap()) as usize;
    let crc_at = offset + 8 + len;
    let declared = u32::from_be_bytes(tagged[crc_at..crc_at + 4].try_into().unwrap());
    assert_eq!(declared, png_crc_slice(&tagged[offset + 4..crc_at]));
    offset = crc_at + 4;
    seen += 1;
  }
  assert_eq!(seen, 4); // IHDR, IDAT, tEXt, IEND
  // and the whole output re-reads cleanly under the strict policy
  let strict = read_chunks(&tagged, ReadOptions { crc: CrcPolicy::Strict });
  assert_eq!(strict.len(), 4);
}

#[test]
fn test_iend_stays_last() {
  let tagged = embed(&tiny_png(), &sample_card()).unwrap();
  let chunks = read_chunks(&tagged, ReadOptions::default());
  assert_eq!(chunks.last().unwrap().ty, ChunkType::IEND);
  // the metadata chunk sits immediately before it
  assert_eq!(chunks[chunks.len() - 2].ty, ChunkType::tEXt);
}

#[test]
fn test_non_png_input_fails_both_ways() {
  let card = sample_card();
  assert_eq!(extract(b"not a png"), None);
  assert_eq!(embed(b"not a png", &card), Err(CardPngError::NotPng));
  assert_eq!(embed(&[], &card), Err(CardPngError::NotPng));
}

#[test]
fn test_missing_iend_refuses_to_embed() {
  // well-formed chunks, but nobody wrote the terminal marker
  let chunks = [PngChunk { ty: ChunkType::IHDR, data: Cow::Borrowed(&[0u8; 13][..]) }];
  let truncated = write_chunks(&chunks);
  assert!(is_png_signature(&truncated));
  assert_eq!(embed(&truncated, &sample_card()), Err(CardPngError::MissingIend));
}

#[test]
fn test_duplicate_chara_chunks_are_deduped() {
  // simulate external tooling leaving two chara chunks behind
  let image = tiny_png();
  let mut chunks = read_chunks(&image, ReadOptions::default());
  let stale = CharacterCard { name: "Stale".to_string(), ..CharacterCard::default() };
  let iend = chunks.len() - 1;
  chunks.insert(iend, build_text_chunk(CHARA_KEYWORD, &stale));
  chunks.insert(iend, build_text_chunk(CHARA_KEYWORD, &stale));
  let doubled = write_chunks(&chunks);

  let fresh = CharacterCard { name: "Fresh".to_string(), ..CharacterCard::default() };
  let fixed = embed(&doubled, &fresh).unwrap();
  let fixed_chunks = read_chunks(&fixed, ReadOptions::default());
  assert_eq!(fixed_chunks.iter().filter(|c| c.ty == ChunkType::tEXt).count(), 1);
  assert_eq!(extract(&fixed).unwrap().name, "Fresh");
}

#[test]
fn test_unrelated_text_chunks_survive_embedding() {
  let image = tiny_png();
  let mut chunks = read_chunks(&image, ReadOptions::default());
  let iend = chunks.len() - 1;
  chunks.insert(iend, PngChunk { ty: ChunkType::tEXt, data: Cow::Borrowed(b"Comment\0hi") });
  let commented = write_chunks(&chunks);

  let tagged = embed(&commented, &sample_card()).unwrap();
  let after = read_chunks(&tagged, ReadOptions::default());
  assert_eq!(after.iter().filter(|c| c.ty == ChunkType::tEXt).count(), 2);
  assert!(after.iter().any(|c| c.data.as_ref() == b"Comment\0hi"));
}

#[test]
fn test_strict_crc_policy_rejects_corrupted_image() {
  let image = tiny_png();
  let card = sample_card();
  let mut corrupted = embed(&image, &card).unwrap();
  // flip a bit inside IHDR's data without fixing its CRC
  corrupted[16] ^= 0x01;
  assert!(extract(&corrupted).is_some(), "lenient read still trusts the chunk");
  let strict = ReadOptions { crc: CrcPolicy::Strict };
  assert_eq!(cardpng::extract_with(&corrupted, strict), None);
  assert!(embed_with(&corrupted, &card, strict).is_err());
}

#[test]
fn test_lorebook_survives_the_container_round_trip() {
  let tagged = embed(&tiny_png(), &sample_card()).unwrap();
  let book = extract(&tagged).unwrap().character_book.unwrap();
  assert_eq!(book.name.as_deref(), Some("Aria's world"));
  assert_eq!(book.entries.len(), 1);
  assert_eq!(book.entries[0].keys, ["tavern"]);
  assert!(book.entries[0].enabled);
}

#[test]
fn test_find_card_keyword_must_match_exactly() {
  let image = tiny_png();
  let mut chunks = read_chunks(&image, ReadOptions::default());
  let iend = chunks.len() - 1;
  chunks.insert(iend, build_text_chunk("charade", &sample_card()));
  let other_keyword = write_chunks(&chunks);
  assert_eq!(extract(&other_keyword), None);
  let chunks = read_chunks(&other_keyword, ReadOptions::default());
  assert!(find_card(&chunks, "charade").is_some());
}

#[test]
fn test_chunk_reading_never_panics_on_garbage() {
  // random data, truncated pngs, and truncated chunk tails
  for _ in 0..10 {
    let v = super::rand_bytes(1024);
    let _ = read_chunks(&v, ReadOptions::default());
    let _ = extract(&v);
  }
  let tagged = embed(&tiny_png(), &sample_card()).unwrap();
  for cut in 0..tagged.len() {
    let _ = extract(&tagged[..cut]);
  }
  let mut with_sig = PNG_SIGNATURE.to_vec();
  with_sig.extend_from_slice(&super::rand_bytes(64));
  let _ = read_chunks(&with_sig, ReadOptions { crc: CrcPolicy::Strict });
}
