//! Browser tests for the motion runtime: reveals, reduced motion and the greeting carousel.
//!
//! Run with: `cargo test --test browser_motion -- --ignored`

use headless_chrome::{Browser, LaunchOptions, Tab};
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, OnceLock};
use std::thread::sleep;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

fn generated_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/browser/generated")
}

fn ensure_fixtures_built() {
    static BUILT: OnceLock<()> = OnceLock::new();
    BUILT.get_or_init(|| {
        let bin = env!("CARGO_BIN_EXE_simple-folio");
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

        let output_dir = generated_dir();
        if output_dir.exists() {
            std::fs::remove_dir_all(&output_dir).expect("failed to clean output dir");
        }

        let status = Command::new(bin)
            .args([
                "build",
                "--source",
                root.join("fixtures/content").to_str().unwrap(),
                "--output",
                output_dir.to_str().unwrap(),
                "--temp-dir",
                root.join(".simple-folio-browser-temp").to_str().unwrap(),
            ])
            .status()
            .expect("failed to run simple-folio");
        assert!(status.success(), "fixture generation failed");
    });
}

fn browser() -> &'static Browser {
    static B: OnceLock<Browser> = OnceLock::new();
    B.get_or_init(|| {
        Browser::new(LaunchOptions {
            window_size: Some((1280, 800)),
            ..Default::default()
        })
        .expect("failed to launch Chrome")
    })
}

fn load_index() -> Arc<Tab> {
    ensure_fixtures_built();
    let tab = browser().new_tab().unwrap();
    let file = generated_dir().join("index.html");
    assert!(file.exists(), "missing: {}", file.display());

    tab.navigate_to(&format!("file://{}", file.display()))
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    tab
}

fn eval(tab: &Tab, js: &str) -> serde_json::Value {
    tab.evaluate(js, false)
        .expect("failed to evaluate JS")
        .value
        .expect("no value returned")
}

fn eval_bool(tab: &Tab, js: &str) -> bool {
    eval(tab, js).as_bool().unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
#[ignore]
fn hero_reveals_on_load() {
    let tab = load_index();
    sleep(Duration::from_millis(300));
    assert!(eval_bool(
        &tab,
        r#"Array.from(document.querySelectorAll("[data-reveal='mount']"))
              .every(el => el.classList.contains('is-visible'))"#,
    ));
}

#[test]
#[ignore]
fn below_the_fold_waits_for_scroll() {
    let tab = load_index();
    sleep(Duration::from_millis(300));
    assert!(!eval_bool(
        &tab,
        r##"document.querySelector("#colophon [data-reveal='view']").classList.contains('is-visible')"##,
    ));

    eval(
        &tab,
        r#"document.getElementById('colophon').scrollIntoView(); true"#,
    );
    sleep(Duration::from_millis(500));
    assert!(eval_bool(
        &tab,
        r##"document.querySelector("#colophon [data-reveal='view']").classList.contains('is-visible')"##,
    ));
}

#[test]
#[ignore]
fn motion_toggle_reveals_everything() {
    let tab = load_index();
    eval(
        &tab,
        r#"localStorage.removeItem('simple-folio:motion');
           document.getElementById('motion-toggle').click(); true"#,
    );
    assert!(eval_bool(
        &tab,
        r#"document.documentElement.getAttribute('data-motion') === 'reduced'"#,
    ));
    assert!(eval_bool(
        &tab,
        r#"document.getElementById('motion-toggle').getAttribute('aria-pressed') === 'true'"#,
    ));
    assert!(eval_bool(
        &tab,
        r#"Array.from(document.querySelectorAll('.reveal'))
              .every(el => el.classList.contains('is-visible'))"#,
    ));
    // restore for other tests sharing the profile
    eval(
        &tab,
        r#"document.getElementById('motion-toggle').click(); true"#,
    );
}

#[test]
#[ignore]
fn greeting_rotates() {
    let tab = load_index();
    let first = eval(
        &tab,
        r#"document.querySelector('.greeting-item.is-current').dataset.index"#,
    );
    sleep(Duration::from_millis(3200));
    let next = eval(
        &tab,
        r#"document.querySelector('.greeting-item.is-current').dataset.index"#,
    );
    assert_ne!(first, next);
}

#[test]
#[ignore]
fn theme_toggle_sets_explicit_theme() {
    let tab = load_index();
    eval(
        &tab,
        r#"document.getElementById('theme-toggle').click(); true"#,
    );
    let theme = eval(&tab, r#"document.documentElement.getAttribute('data-theme')"#);
    let theme = theme.as_str().expect("data-theme is not set");
    assert!(theme == "light" || theme == "dark", "theme was {theme}");
}
