//! Decode fuzz target: feed arbitrary text to the envelope decoder, then re-encode.
//! Neither step may panic; decode errors are expected and ignored.
//! Build with: cargo fuzz run scan_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    let codec = match txrep::transaction::codec() {
        Ok(c) => c,
        Err(_) => return,
    };
    let mut env = match codec.default_value(&txrep::transaction::envelope_spec()) {
        Ok(v) => v,
        Err(_) => return,
    };
    let mut help = txrep::HelpFields::new();
    let _ = codec.decode(s, &mut env, &mut help);
    let _ = codec.encode(&env, &help);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run scan_fuzz");
}
