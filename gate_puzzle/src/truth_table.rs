use gate_sim::GateId;
use itertools::Itertools;

use crate::puzzle::TestVector;

/// One vector per row of the truth table of `f` over the given switches.
///
/// Rows count up in binary with the first switch as the most significant
/// bit. `f` receives the switch values and returns one value per output.
///
/// # Panics
///
/// Panics if there are `usize::BITS` or more inputs, since the rows cannot
/// be counted, or if `f` returns a different number of values than there
/// are outputs.
pub fn truth_table<F>(inputs: &[GateId], outputs: &[GateId], f: F) -> Vec<TestVector>
where
    F: Fn(&[bool]) -> Vec<bool>,
{
    let n = inputs.len();
    assert!(
        n < usize::BITS as usize,
        "truth table over {n} inputs has too many rows"
    );
    (0..1usize << n)
        .map(|row| {
            let bits = (0..n)
                .map(|i| (row >> (n - 1 - i)) & 1 == 1)
                .collect_vec();
            let expected = f(&bits);
            assert_eq!(
                expected.len(),
                outputs.len(),
                "truth table function must produce one value per output"
            );
            let label = format!(
                "{} -> {}",
                bits.iter().map(|&b| b as u8).join(""),
                expected.iter().map(|&b| b as u8).join("")
            );
            TestVector::new(
                inputs.iter().copied().zip(bits).collect(),
                outputs.iter().copied().zip(expected).collect(),
            )
            .with_label(label)
        })
        .collect()
}
