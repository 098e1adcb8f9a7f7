use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rustc_hash::FxHashSet;

use super::*;

fn keys(list: &str) -> Vec<String> {
	list.chars().map(String::from).collect()
}

fn config(single: &str, multi: &str) -> KeyClassConfig {
	KeyClassConfig {
		single_char_keys: keys(single),
		multi_char_keys: keys(multi),
		hint_groups_enabled: true,
		..KeyClassConfig::default()
	}
}

fn expected_numeric() -> Vec<String> {
	let mut out: Vec<String> = (1..=99).map(|n| format!("{n:02}")).collect();
	out.push("00".to_string());
	out
}

#[test]
fn zero_count_is_empty() {
	assert!(generate(0, &config("AS", "BC")).is_empty());
}

#[test]
fn single_keys_come_first_in_order() {
	assert_eq!(generate(2, &config("ASD", "BC")), vec!["A", "S"]);
}

#[test]
fn two_char_combinations_are_row_major() {
	assert_eq!(generate(7, &config("AS", "BC")), vec!["A", "S", "BB", "BC", "CB", "CC"]);
}

#[test]
fn max_single_char_hints_limits_stage_one() {
	let mut cfg = config("ASD", "BC");
	cfg.max_single_char_hints = Some(1);
	assert_eq!(generate(4, &cfg), vec!["A", "BB", "BC", "CB"]);

	cfg.max_single_char_hints = Some(0);
	assert_eq!(generate(1, &cfg), vec!["BB"]);
}

#[test]
fn negative_limit_disables_single_hints_without_failing() {
	let mut cfg = config("AS", "B");
	cfg.max_single_char_hints = Some(-5);
	assert_eq!(generate(5, &cfg), vec!["BB"]);
}

#[test]
fn numeric_fallback_follows_combinations() {
	let mut cfg = config("A", "B");
	cfg.use_numeric_fallback = true;
	assert_eq!(generate(5, &cfg), vec!["A", "BB", "01", "02", "03"]);
}

#[test]
fn numeric_fallback_caps_at_one_hundred() {
	let mut cfg = config("", "");
	cfg.use_numeric_fallback = true;
	let hints = generate(500, &cfg);
	assert_eq!(hints, expected_numeric());
}

#[test]
fn numeric_multi_keys_use_numeric_order() {
	let cfg = config("", "0123456789");
	assert_eq!(generate(100, &cfg), expected_numeric());
}

#[test]
fn numeric_multi_keys_do_not_repeat_with_fallback_enabled() {
	let mut cfg = config("AS", "0123456789");
	cfg.use_numeric_fallback = true;
	let hints = generate(1000, &cfg);
	assert_eq!(hints.len(), 102);
	assert_eq!(&hints[..4], &["A", "S", "01", "02"]);
	assert_eq!(hints.last().map(String::as_str), Some("00"));
}

#[test]
fn short_list_when_capacity_is_exhausted() {
	let hints = generate(50, &config("AS", "BC"));
	assert_eq!(hints.len(), 6);
}

#[test]
fn mixed_digit_keys_never_repeat_numeric_hints() {
	let mut cfg = config("", "A1");
	cfg.use_numeric_fallback = true;
	let hints = generate(200, &cfg);
	let unique: FxHashSet<_> = hints.iter().collect();
	assert_eq!(unique.len(), hints.len());
	// "11" comes from the combinations, so the fallback skips it.
	assert_eq!(hints.iter().filter(|h| h.as_str() == "11").count(), 1);
	assert_eq!(hints.len(), 4 + 99);
}

#[test]
fn numeric_hint_boundaries() {
	assert_eq!(numeric_hint(0).as_deref(), Some("01"));
	assert_eq!(numeric_hint(8).as_deref(), Some("09"));
	assert_eq!(numeric_hint(9).as_deref(), Some("10"));
	assert_eq!(numeric_hint(98).as_deref(), Some("99"));
	assert_eq!(numeric_hint(99).as_deref(), Some("00"));
	assert_eq!(numeric_hint(100), None);
}

#[test]
fn markers_use_single_characters_when_they_suffice() {
	assert_eq!(generate_from_markers(3, &keys("ASDF"), false), vec!["A", "S", "D"]);
}

#[test]
fn markers_switch_to_two_characters_when_short() {
	let hints = generate_from_markers(5, &keys("AS"), false);
	assert_eq!(hints, vec!["AA", "AS", "SA", "SS"]);

	let hints = generate_from_markers(6, &keys("AS"), true);
	assert_eq!(hints, vec!["AA", "AS", "SA", "SS", "01", "02"]);
}

#[test]
fn memoized_generation_hits_cache() {
	let mut generator = HintGenerator::new(4);
	let cfg = config("AS", "BC");
	let first = generator.generate(3, &cfg);
	let second = generator.generate(3, &cfg);
	assert_eq!(first, second);
	assert_eq!(generator.stats().hits, 1);
	assert_eq!(generator.stats().misses, 1);

	let _ = generator.generate(4, &cfg);
	assert_eq!(generator.stats().misses, 2);
}

fn arb_config() -> impl Strategy<Value = KeyClassConfig> {
	let alphabet: Vec<char> = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789;".chars().collect();
	(
		proptest::sample::subsequence(alphabet, 0..20),
		any::<u64>(),
		proptest::option::of(0i64..12),
		any::<bool>(),
	)
		.prop_map(|(chars, split_seed, max_single, numeric)| {
			let split = if chars.is_empty() { 0 } else { (split_seed as usize) % (chars.len() + 1) };
			let (single, multi) = chars.split_at(split);
			KeyClassConfig {
				single_char_keys: single.iter().map(|ch| ch.to_string()).collect(),
				multi_char_keys: multi.iter().map(|ch| ch.to_string()).collect(),
				max_single_char_hints: max_single,
				use_numeric_fallback: numeric,
				hint_groups_enabled: true,
			}
		})
}

fn stage_of(hint: &str, cfg: &KeyClassConfig) -> u8 {
	if hint.chars().count() == 1 {
		0
	} else if hint.chars().all(|ch| ch.is_ascii_digit()) && (cfg.has_numeric_multi_keys() || !cfg.multi_char_keys.iter().any(|k| k.chars().all(|c| c.is_ascii_digit()))) {
		2
	} else {
		1
	}
}

proptest! {
	#[test]
	fn generated_hints_are_unique_and_bounded(cfg in arb_config(), count in 0usize..400) {
		let hints = generate(count, &cfg);
		prop_assert!(hints.len() <= count);
		let unique: FxHashSet<_> = hints.iter().collect();
		prop_assert_eq!(unique.len(), hints.len());
	}

	#[test]
	fn stages_never_go_backwards(cfg in arb_config(), count in 0usize..400) {
		let hints = generate(count, &cfg);
		let stages: Vec<u8> = hints.iter().map(|hint| stage_of(hint, &cfg)).collect();
		prop_assert!(stages.windows(2).all(|pair| pair[0] <= pair[1]), "stages out of order: {:?}", hints);
	}

	#[test]
	fn shorter_requests_are_prefixes(cfg in arb_config(), count in 0usize..200, extra in 0usize..50) {
		let short = generate(count, &cfg);
		let long = generate(count + extra, &cfg);
		prop_assert_eq!(&long[..short.len()], &short[..]);
	}
}
