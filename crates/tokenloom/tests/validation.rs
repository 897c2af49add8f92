#![allow(missing_docs)]

use std::sync::Arc;

use tokenloom::decoders::PieceJoiner;
use tokenloom::encoders::{
    BpeEncoder,
    EncoderKind,
    RankTableEncoder,
    SpanEncoder,
    TrieEncoder,
    UnigramEncoder,
    WordPieceEncoder,
};
use tokenloom::normalize::ByteLevel;
use tokenloom::pipeline::{DetokenizerPipeline, PipelineConfig, TokenizerPipeline};
use tokenloom::ragged::{PaddedBatch, PaddingSpec, RaggedBatch};
use tokenloom::template::Template;
use tokenloom::vocab::{
    MergeVocab,
    RankVocab,
    ScoredVocab,
    SpecialVocab,
    TokenVocab,
    TrieVocab,
};

type T = u32;

const SAMPLES: &[&str] = &[
    "hello world",
    "The quick brown fox jumps over the lazy dog.",
    "  multiple   spaces  ",
    "123 + 456 = 789",
    "caf\u{00e9} na\u{00ef}ve \u{4f50}\u{597d}",
    "$$$!!!...---",
    " ",
    "a",
    "emoji: \u{1f600}\u{1f680}\u{1f4a1}",
];

/// A merge table `{(a,b) rank 0, (ab,c) rank 1}` collapses
/// "abc" to the single id 4.
#[test]
fn bpe_merge_chain_collapses() {
    let vocab = Arc::new(
        TokenVocab::<T>::try_from_str_pairs([
            ("a", 0),
            ("b", 1),
            ("c", 2),
            ("ab", 3),
            ("abc", 4),
            ("unk", 5),
        ])
        .unwrap(),
    );
    let merges = MergeVocab::try_new([("a", "b"), ("ab", "c")], &vocab).unwrap();
    let specials = SpecialVocab::default().with_unk("unk", 5);
    let encoder = BpeEncoder::try_new(vocab, merges, None, &specials).unwrap();

    assert_eq!(encoder.encode_span("abc"), vec![4]);
}

/// "unable" greedy-matches whole; "unbelievable" has no
/// valid continuation chain and maps to unk.
#[test]
fn wordpiece_greedy_matching() {
    let vocab = Arc::new(
        TokenVocab::<T>::try_from_str_pairs([
            ("un", 0),
            ("##able", 1),
            ("unable", 2),
            ("[UNK]", 3),
        ])
        .unwrap(),
    );
    let specials = SpecialVocab::default().with_unk("[UNK]", 3);
    let encoder = WordPieceEncoder::try_new(vocab, "##", &specials).unwrap();

    assert_eq!(encoder.encode_span("unable"), vec![2]);
    assert_eq!(encoder.encode_span("unbelievable"), vec![3]);
}

/// Greedy longest-prefix picks "Hello" over "He".
#[test]
fn trie_longest_prefix_match() {
    let trie = Arc::new(
        TrieVocab::<T>::try_from_pairs([("He", 0), ("Hello", 1), ("llo", 2)]).unwrap(),
    );
    let specials = SpecialVocab::default().with_unk("<unk>", 9);
    let encoder = TrieEncoder::try_new(trie, &specials, false).unwrap();

    assert_eq!(encoder.encode_span("Hello"), vec![1]);
}

/// Rows of lengths 3 and 5 at `max_length` 5 pad to
/// `[t0, t1, t2, 0, 0]` with mask `[1, 1, 1, 0, 0]`.
#[test]
fn padding_masks_real_tokens() {
    let batch = RaggedBatch::from_rows(vec![vec![10_u32, 11, 12], vec![1, 2, 3, 4, 5]]);
    let spec = PaddingSpec {
        max_length: Some(5),
        pad_to_max: true,
        ..Default::default()
    };
    let padded = PaddedBatch::from_ragged(&batch, 0, &spec).unwrap();

    assert_eq!(padded.row(0), &[10, 11, 12, 0, 0]);
    assert_eq!(padded.mask_row(0), &[1, 1, 1, 0, 0]);

    for i in 0..padded.num_rows() {
        let count = padded.mask_row(i).iter().map(|&m| m as usize).sum::<usize>();
        assert_eq!(count, batch.row(i).len().min(5));
    }
}

/// `skip_special_tokens` drops registered bos/eos ids.
#[test]
fn decode_skips_registered_specials() {
    let vocab = Arc::new(
        TokenVocab::<T>::try_from_str_pairs([
            ("<s>", 1),
            ("</s>", 2),
            ("left", 4),
            ("right", 7),
        ])
        .unwrap(),
    );
    let specials = SpecialVocab::default().with_bos("<s>", 1).with_eos("</s>", 2);

    let detok = DetokenizerPipeline::try_new(
        vocab,
        specials,
        PieceJoiner::Continuation("##".to_string()),
        &PipelineConfig::default().with_skip_special_tokens(true),
    )
    .unwrap();

    let batch = RaggedBatch::from_rows(vec![vec![1, 4, 7, 2]]);
    assert_eq!(detok.decode_batch(&batch), vec!["left right"]);
}

fn byte_level_pipeline() -> (TokenizerPipeline<T>, DetokenizerPipeline<T>) {
    let table = Arc::new(ByteLevel::default());

    // Single-byte entries for the whole byte space, keyed by their
    // remapped chars, plus one learned merge.
    let mut entries: Vec<(String, T)> = (0..=255_u8)
        .map(|b| (table.encode_byte(b).to_string(), b as T))
        .collect();
    entries.push(("he".to_string(), 256));
    let vocab = Arc::new(TokenVocab::try_from_pairs(
        entries.into_iter().map(|(s, t)| (s.into_bytes(), t)),
    ).unwrap());

    let merges = MergeVocab::try_new([("h", "e")], &vocab).unwrap();
    let specials = SpecialVocab::default();
    let encoder =
        BpeEncoder::try_new(vocab.clone(), merges, Some(table.clone()), &specials).unwrap();

    let pipeline = TokenizerPipeline::try_new(
        EncoderKind::Bpe(encoder),
        specials.clone(),
        None,
        None,
        PipelineConfig::default().with_byte_level(true),
    )
    .unwrap();

    let detok = DetokenizerPipeline::try_new(
        vocab,
        specials,
        PieceJoiner::ByteLevel(table),
        &PipelineConfig::default(),
    )
    .unwrap();

    (pipeline, detok)
}

/// Byte-level BPE reconstructs arbitrary text exactly: every byte is a
/// symbol, so whitespace and emoji survive the round trip.
#[test]
fn byte_level_roundtrip() {
    let (pipeline, detok) = byte_level_pipeline();

    // Whitespace splitting drops separators; encode word-ish samples.
    for text in ["hello", "he", "\u{1f600}", "$$$!!!...---"] {
        let rows = pipeline.encode_rows(&[text]);
        let decoded = detok.decode_batch(&rows);
        assert_eq!(decoded, vec![text], "roundtrip mismatch: {text:?}");
    }
}

fn rank_table_pipeline() -> (TokenizerPipeline<T>, DetokenizerPipeline<T>) {
    let mut pairs: Vec<(Vec<u8>, T)> = (0..=255_u8).map(|b| (vec![b], b as T)).collect();
    pairs.push((b"he".to_vec(), 256));
    pairs.push((b"ll".to_vec(), 257));
    pairs.push((b"llo".to_vec(), 258));

    let ranks = Arc::new(
        RankVocab::try_from_pairs(pairs.clone(), r"\s+|\S+").unwrap(),
    );
    let vocab = Arc::new(TokenVocab::try_from_pairs(pairs).unwrap());
    let specials = SpecialVocab::default();

    let pipeline = TokenizerPipeline::try_new(
        EncoderKind::RankTable(RankTableEncoder::new(ranks)),
        specials.clone(),
        None,
        None,
        PipelineConfig::default(),
    )
    .unwrap();

    let detok = DetokenizerPipeline::try_new(
        vocab,
        specials,
        PieceJoiner::Plain,
        &PipelineConfig::default(),
    )
    .unwrap();

    (pipeline, detok)
}

/// Rank tables cover every single byte, so any input resolves and
/// round-trips; the pre-segmentation pattern keeps whitespace spans.
#[test]
fn rank_table_roundtrip_all_samples() {
    let (pipeline, detok) = rank_table_pipeline();

    for &text in SAMPLES {
        let rows = pipeline.encode_rows(&[text]);
        assert!(
            !rows.row(0).is_empty(),
            "non-empty input produced no ids: {text:?}"
        );
        let decoded = detok.decode_batch(&rows);
        assert_eq!(decoded, vec![text], "roundtrip mismatch: {text:?}");
    }
}

/// Unigram picks the higher-probability segmentation end-to-end.
#[test]
fn unigram_pipeline_segmentation() {
    let scored = Arc::new(
        ScoredVocab::<T>::try_from_entries([
            ("hell", 0, -4.0),
            ("o", 1, -1.0),
            ("hello", 2, -3.0),
            ("<unk>", 3, -100.0),
        ])
        .unwrap(),
    );
    let specials = SpecialVocab::default().with_unk("<unk>", 3);
    let encoder = UnigramEncoder::try_new(scored, &specials).unwrap();

    // "hello" at -3.0 beats "hell" + "o" at -5.0.
    assert_eq!(encoder.encode_span("hello"), vec![2]);
    // The unmatched "x" run collapses to one unk mid-stream.
    assert_eq!(encoder.encode_span("helloxo"), vec![2, 3, 1]);
}

/// Determinism: identical (definition, config, batch) yields identical
/// tensors across invocations.
#[test]
fn determinism_across_invocations() {
    let (pipeline, _) = rank_table_pipeline();

    let a = pipeline.encode_batch(&SAMPLES.to_vec()).unwrap();
    let b = pipeline.encode_batch(&SAMPLES.to_vec()).unwrap();

    assert_eq!(a.input_ids(), b.input_ids());
    assert_eq!(a.attention_mask(), b.attention_mask());
    assert_eq!(a.num_cols(), b.num_cols());
}

/// Row independence: each row encodes the same alone or in a batch.
#[test]
fn row_independence() {
    let (pipeline, _) = rank_table_pipeline();

    let batch = pipeline.encode_rows(&SAMPLES.to_vec());
    for (i, &text) in SAMPLES.iter().enumerate() {
        let single = pipeline.encode_rows(&[text]);
        assert_eq!(batch.row(i), single.row(0), "row {i} diverged: {text:?}");
    }
}

/// BERT-style pair classification end-to-end: truncation boundary,
/// mask arithmetic, and token type ids.
#[test]
fn pair_classification_end_to_end() {
    let vocab = Arc::new(
        TokenVocab::<T>::try_from_str_pairs([
            ("this", 10),
            ("that", 11),
            ("other", 12),
            ("[UNK]", 0),
            ("[CLS]", 1),
            ("[SEP]", 2),
            ("[PAD]", 3),
        ])
        .unwrap(),
    );
    let specials = SpecialVocab::default()
        .with_unk("[UNK]", 0)
        .with_cls("[CLS]", 1)
        .with_sep("[SEP]", 2)
        .with_pad("[PAD]", 3);
    let encoder = WordPieceEncoder::try_new(vocab, "##", &specials).unwrap();
    let template = Template::classifier(&specials).unwrap();

    let pipeline = TokenizerPipeline::try_new(
        EncoderKind::WordPiece(encoder),
        specials,
        Some(template),
        None,
        PipelineConfig::default()
            .with_max_length(Some(7))
            .with_pad_to_max(true),
    )
    .unwrap();

    let tensors = pipeline
        .encode_pair_batch(&[("this this this", "that"), ("other", "that that")])
        .unwrap();

    assert_eq!(tensors.num_rows(), 2);
    assert_eq!(tensors.num_cols(), 7);

    // Longest-first truncation: 3 + 1 content ids fit budget 4.
    assert_eq!(tensors.padded().row(0), &[1, 10, 10, 10, 2, 11, 2]);
    assert_eq!(tensors.token_type_ids().unwrap()[..7], [0, 0, 0, 0, 0, 1, 1]);

    // Row 1 is shorter and pads out; mask sums to the real count.
    assert_eq!(tensors.padded().row(1), &[1, 12, 2, 11, 11, 2, 3]);
    assert_eq!(
        tensors.padded().mask_row(1).iter().map(|&m| m as usize).sum::<usize>(),
        6,
    );
}

/// Normalization applied twice equals normalization applied once.
#[test]
fn normalization_idempotence_end_to_end() {
    let vocab = Arc::new(
        TokenVocab::<T>::try_from_str_pairs([("cafe", 5), ("[UNK]", 0)]).unwrap(),
    );
    let specials = SpecialVocab::default().with_unk("[UNK]", 0);
    let encoder = WordPieceEncoder::try_new(vocab, "##", &specials).unwrap();

    let pipeline = TokenizerPipeline::try_new(
        EncoderKind::WordPiece(encoder),
        specials,
        None,
        None,
        PipelineConfig::default()
            .with_lowercase(true)
            .with_strip_accents(true)
            .with_add_special_tokens(false),
    )
    .unwrap();

    // "Café" normalizes to "cafe" whether composed or decomposed.
    let composed = pipeline.encode_rows(&["Caf\u{00e9}"]);
    let decomposed = pipeline.encode_rows(&["Cafe\u{0301}"]);
    assert_eq!(composed.row(0), &[5]);
    assert_eq!(composed.row(0), decomposed.row(0));
}
