use std::fs;
use std::path::Path;

use ovlpack::batch::{run_batch, BatchConfig};
use ovlpack::error::{GameErrorKind, LayoutError};
use ovlpack::names::parse_names;
use ovlpack::orientation::OrientationTable;

const WHITE_SCREEN: &str = r#"<?xml version="1.0"?>
<mamelayout version="2">
    <element name="overlay">
        <rect>
            <color red="1" green="1" blue="1" />
        </rect>
    </element>
</mamelayout>
"#;

const GREEN_BAND: &str = r#"<?xml version="1.0"?>
<mamelayout version="2">
    <element name="overlay">
        <rect>
            <color red="1" green="0" blue="0" />
        </rect>
        <rect>
            <bounds left="0" top="16" right="256" bottom="33" />
            <color red="0" green="1" blue="0" />
        </rect>
    </element>
</mamelayout>
"#;

const BROKEN_BOUNDS: &str = r#"<mamelayout>
    <element name="overlay">
        <rect>
            <bounds left="0" top="16" right="256" />
            <color red="0" green="1" blue="0" />
        </rect>
    </element>
</mamelayout>
"#;

fn setup(layouts: &[(&str, &str)]) -> (tempfile::TempDir, BatchConfig) {
    let root = tempfile::tempdir().unwrap();
    let layout_dir = root.path().join("layout");
    let out_dir = root.path().join("out");
    fs::create_dir_all(&layout_dir).unwrap();
    fs::create_dir_all(&out_dir).unwrap();

    for (game, text) in layouts {
        fs::write(layout_dir.join(format!("{}.lay", game)), text).unwrap();
    }

    let config = BatchConfig {
        layout_dir,
        out_dir,
        orientations: OrientationTable::builtin(),
        keep_going: false,
    };
    (root, config)
}

fn read_bin(out: &Path, game: &str) -> Vec<u8> {
    fs::read(out.join(format!("col_{}.bin", game))).unwrap()
}

#[test]
fn emits_bin_and_txt_for_each_layout() {
    let (_root, config) = setup(&[("sicv", WHITE_SCREEN), ("sisv", GREEN_BAND)]);
    let games = parse_names("sicv\n\nsisv\n");

    let report = run_batch(&games, &config).unwrap();
    assert_eq!(report.emitted, vec!["sicv", "sisv"]);
    assert!(report.is_success());

    let bin = read_bin(&config.out_dir, "sicv");
    assert_eq!(bin.len(), 1024);
    assert!(bin[..128].iter().all(|b| *b == 0));
    assert!(bin[128..].iter().all(|b| *b == 0x07));

    let txt = fs::read_to_string(config.out_dir.join("col_sicv.txt")).unwrap();
    let tokens: Vec<&str> = txt.split(' ').collect();
    assert_eq!(tokens.len(), 1024);
    assert!(tokens.iter().all(|t| t.len() == 2 && t.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))));
    assert_eq!(txt, bin.iter().map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(" "));
}

#[test]
fn second_rect_wins_in_overlap() {
    let (_root, config) = setup(&[("sisv", GREEN_BAND)]);
    run_batch(&parse_names("sisv"), &config).unwrap();

    let bin = read_bin(&config.out_dir, "sisv");
    // stripe 0 (rows 0-7) keeps the red background, stripes 2-3 (rows 16-31) are green
    assert!(bin[128..128 + 32].iter().all(|b| *b == 0x01));
    assert!(bin[128 + 64..128 + 128].iter().all(|b| *b == 0x04));
    assert!(bin[128 + 4 * 32..].iter().all(|b| *b == 0x01));
}

#[test]
fn vertical_flip_game_uses_mirrored_axes() {
    let (_root, config) = setup(&[("invaders", GREEN_BAND)]);
    run_batch(&parse_names("invaders"), &config).unwrap();

    let bin = read_bin(&config.out_dir, "invaders");
    // band becomes columns 223..=238: column bytes 27..=29 of every stripe
    for stripe in bin[128..].chunks(32) {
        assert_eq!(stripe[26], 0x01);
        assert_eq!(&stripe[27..30], &[0x04, 0x04, 0x04]);
        assert_eq!(stripe[30], 0x01);
    }
}

#[test]
fn missing_layout_produces_no_output() {
    let (_root, config) = setup(&[("sicv", WHITE_SCREEN)]);
    let report = run_batch(&parse_names("nolayout\nsicv"), &config).unwrap();

    assert_eq!(report.skipped, vec!["nolayout"]);
    assert_eq!(report.emitted, vec!["sicv"]);
    assert!(!config.out_dir.join("col_nolayout.bin").exists());
    assert!(!config.out_dir.join("col_nolayout.txt").exists());
}

#[test]
fn bad_layout_aborts_the_run() {
    let (_root, config) = setup(&[("broken", BROKEN_BOUNDS), ("sicv", WHITE_SCREEN)]);
    let err = run_batch(&parse_names("broken\nsicv"), &config).unwrap_err();

    assert_eq!(err.game, "broken");
    assert!(matches!(
        err.source,
        GameErrorKind::Layout(LayoutError::MissingAttribute { node: "bounds", attr: "bottom" })
    ));
    assert!(!config.out_dir.join("col_broken.bin").exists());
    assert!(!config.out_dir.join("col_sicv.bin").exists());
}

#[test]
fn keep_going_reports_failures_and_continues() {
    let (_root, mut config) = setup(&[("broken", BROKEN_BOUNDS), ("sicv", WHITE_SCREEN)]);
    config.keep_going = true;

    let report = run_batch(&parse_names("broken\nsicv"), &config).unwrap();
    assert!(!report.is_success());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].game, "broken");
    assert_eq!(report.emitted, vec!["sicv"]);
    assert!(!config.out_dir.join("col_broken.txt").exists());
    assert_eq!(read_bin(&config.out_dir, "sicv").len(), 1024);
}
