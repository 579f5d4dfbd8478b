//! Whole-file scenarios exercised through the public library API.

use chrono::{NaiveDate, NaiveDateTime};
use nacha_file::file::block_layout;
use nacha_file::{BatchOptions, NachaError, NachaFile, OriginatorConfig, Transaction};

fn created() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 15)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

fn config() -> OriginatorConfig {
    OriginatorConfig::new(
        "1234567890",
        "1234567890",
        "Acme Corp",
        "021000021",
        "987654321",
        "First Bank",
    )
}

fn open(config: &OriginatorConfig) -> NachaFile {
    NachaFile::with_creation_time(config, created()).unwrap()
}

fn payee(amount: &str, id: &str) -> Transaction {
    Transaction::new(amount, "John Doe", "011000015", "12345678", id)
}

fn render_lines(file: &mut NachaFile) -> Vec<String> {
    let output = file.render().unwrap();
    assert!(output.ends_with('\n'));
    output.lines().map(str::to_string).collect()
}

// ==================== END TO END ====================

#[test]
fn test_single_debit_file() {
    let mut file = open(&config());
    file.create_debit_entry(&payee("100.00", "INV001"), Some(&BatchOptions::new("Rent")))
        .unwrap();

    let lines = render_lines(&mut file);
    let padding = "9".repeat(94);

    let sp = |n: usize| " ".repeat(n);

    let expected = vec![
        [
            "1", "01", " 021000021", " 234567890", "240315", "0930", "A", "094", "10", "1",
            "FIRST BANK", sp(13).as_str(), "ACME CORP", sp(14).as_str(), sp(8).as_str(),
        ]
        .concat(),
        [
            "5", "200", "ACME CORP", sp(7).as_str(), sp(20).as_str(), "1234567890", "CCD", "RENT", sp(6).as_str(),
            sp(6).as_str(), "240315", sp(3).as_str(), "1", "02100002", "0000001",
        ]
        .concat(),
        [
            "6", "27", "011000015", "12345678", sp(9).as_str(), "0000010000", "INV001", sp(9).as_str(),
            "JOHN DOE", sp(14).as_str(), sp(2).as_str(), "0", "02100002", "0000001",
        ]
        .concat(),
        [
            "8", "200", "000001", "0001100001", "000000010000", "000000000000", "1234567890",
            sp(19).as_str(), sp(6).as_str(), "02100002", "0000001",
        ]
        .concat(),
        [
            "9", "000001", "000001", "00000001", "0001100001", "000000010000", "000000000000",
            sp(39).as_str(),
        ]
        .concat(),
        padding.clone(),
        padding.clone(),
        padding.clone(),
        padding.clone(),
        padding,
    ];

    assert_eq!(lines, expected);
}

#[test]
fn test_every_record_is_94_characters() {
    let balanced = config().balanced();
    let mut file = open(&balanced);
    let options = BatchOptions::new("PAYROLL").personal();

    file.create_credit_entry(&payee("1500.00", "P1"), Some(&options))
        .unwrap();
    file.create_credit_entry(&payee("2750.50", "P2").savings(), None)
        .unwrap();
    file.create_debit_entry(&payee("10.01", "D1"), Some(&BatchOptions::new("FEES")))
        .unwrap();

    let lines = render_lines(&mut file);
    assert_eq!(lines.len() % 10, 0);
    assert!(lines.iter().all(|l| l.len() == 94));
}

// ==================== CONTROL TOTALS ====================

#[test]
fn test_batch_totals_match_entries() {
    let mut file = open(&config());
    let options = BatchOptions::new("MIXED");

    file.create_debit_entry(&payee("100.00", "D1"), Some(&options))
        .unwrap();
    file.create_debit_entry(&payee("0.99", "D2"), None).unwrap();
    file.create_credit_entry(
        &Transaction::new("12.34", "Jane Roe", "021000021", "42", "C1"),
        None,
    )
    .unwrap();

    let totals = file.totals();
    assert_eq!(totals.total_debits, 10099);
    assert_eq!(totals.total_credits, 1234);
    assert_eq!(totals.entry_hash, 1_100_001 * 2 + 2_100_002);

    let lines = render_lines(&mut file);
    let control = &lines[5];
    assert!(control.starts_with('8'));
    assert_eq!(&control[4..10], "000003");
    assert_eq!(&control[10..20], "0004300004");
    assert_eq!(&control[20..32], "000000010099");
    assert_eq!(&control[32..44], "000000001234");
}

#[test]
fn test_balanced_file_mirrors_every_entry() {
    let mut file = open(&config().balanced());
    let options = BatchOptions::new("SETTLE");

    file.create_debit_entry(&payee("100.00", "B1"), Some(&options))
        .unwrap();
    file.create_debit_entry(&payee("25.50", "B2"), None).unwrap();
    file.create_credit_entry(&payee("10.00", "B3"), Some(&options))
        .unwrap();

    let batches = file.batches();
    assert_eq!(batches[0].entries().len(), 4);
    assert_eq!(batches[0].total_debits(), 12550);
    assert_eq!(batches[0].total_credits(), 12550);
    assert_eq!(batches[0].hash_sum(), (1_100_001 + 2_100_002) * 2);

    assert_eq!(batches[1].total_debits(), 1000);
    assert_eq!(batches[1].total_credits(), 1000);

    let codes: Vec<u8> = batches[0]
        .entries()
        .iter()
        .map(|e| e.code().code())
        .collect();
    assert_eq!(codes, vec![27, 22, 27, 22]);

    let totals = file.totals();
    assert_eq!(totals.entry_count, 6);
    assert_eq!(totals.total_debits, totals.total_credits);
}

#[test]
fn test_file_hash_sums_batches() {
    let mut file = open(&config());
    for id in ["H1", "H2", "H3"] {
        file.create_credit_entry(&payee("1.00", id), Some(&BatchOptions::new("HASH")))
            .unwrap();
    }

    let lines = render_lines(&mut file);
    assert_eq!(lines.len(), 20);
    let file_control = &lines[10];
    assert_eq!(&file_control[1..7], "000003");
    assert_eq!(&file_control[7..13], "000002");
    assert_eq!(&file_control[13..21], "00000003");
    assert_eq!(&file_control[21..31], "0003300003");
    assert_eq!(&file_control[43..55], "000000000300");
}

// ==================== BLOCK PADDING ====================

#[test]
fn test_block_layout() {
    assert_eq!(block_layout(5), (1, 5));
    assert_eq!(block_layout(10), (1, 0));
    assert_eq!(block_layout(11), (2, 9));
    assert_eq!(block_layout(23), (3, 7));
}

#[test]
fn test_twenty_three_lines_pad_to_thirty() {
    let mut file = open(&config());
    let options = BatchOptions::new("BULK");
    file.create_credit_entry(&payee("1.00", "E0"), Some(&options))
        .unwrap();
    for i in 1..19 {
        file.create_credit_entry(&payee("1.00", &format!("E{}", i)), None)
            .unwrap();
    }

    let totals = file.totals();
    assert_eq!(totals.line_count, 23);
    assert_eq!(totals.block_count, 3);
    assert_eq!(totals.padding_lines, 7);

    let lines = render_lines(&mut file);
    assert_eq!(lines.len(), 30);
    assert_eq!(&lines[22][7..13], "000003");
    assert!(lines[23..].iter().all(|l| *l == "9".repeat(94)));
}

#[test]
fn test_full_block_needs_no_padding() {
    let mut file = open(&config());
    file.create_credit_entry(&payee("1.00", "F0"), Some(&BatchOptions::new("FULL")))
        .unwrap();
    for i in 1..6 {
        file.create_credit_entry(&payee("1.00", &format!("F{}", i)), None)
            .unwrap();
    }

    let lines = render_lines(&mut file);
    assert_eq!(lines.len(), 10);
    assert!(lines[9].starts_with("9000001000001"));
}

// ==================== LIFECYCLE ====================

#[test]
fn test_render_twice_is_rejected() {
    let mut file = open(&config());
    file.create_debit_entry(&payee("5.00", "R1"), Some(&BatchOptions::new("ONCE")))
        .unwrap();

    assert!(file.render().is_ok());
    assert!(matches!(file.render(), Err(NachaError::FileClosed)));
}

#[test]
fn test_failed_entry_does_not_change_totals() {
    let mut file = open(&config());
    file.create_debit_entry(&payee("5.00", "OK1"), Some(&BatchOptions::new("KEEP")))
        .unwrap();

    let before = file.totals();
    assert!(file.create_debit_entry(&payee("5.001", "BAD1"), None).is_err());
    assert!(file
        .create_debit_entry(&payee("5.00", "BAD2"), Some(&BatchOptions::new("")))
        .is_err());
    assert_eq!(file.totals(), before);
    assert_eq!(file.batches().len(), 1);
}

#[test]
fn test_invalid_originator_is_refused() {
    let err = NachaFile::new(&config().file_modifier("-")).unwrap_err();
    assert_eq!(err.to_string(), "Invalid file modifier");
}
