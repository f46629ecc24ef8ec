use anyhow::{ensure, Context, Result};

const DEFAULT_ROWS: usize = 200;

const SPECIALTIES: [(&str, &[&str]); 5] = [
    ("Cardiovascular / Pulmonary", &["heart", "chest pain", "echocardiogram", "lung", "dyspnea"]),
    ("Neurology", &["brain", "headache", "seizure", "mri", "neuropathy"]),
    ("Orthopedic", &["knee", "fracture", "arthroscopy", "shoulder", "tendon"]),
    ("Gastroenterology", &["colonoscopy", "abdomen", "liver", "reflux", "polyp"]),
    ("Radiology", &["x-ray", "ct scan", "contrast", "ultrasound", "mri"]),
];

const SENTENCES: [&str; 6] = [
    "The patient presents for evaluation.",
    "History is otherwise unremarkable.",
    "Vital signs are stable on arrival.",
    "Findings were discussed with the patient.",
    "Follow-up is scheduled in two weeks.",
    "No acute distress was noted on examination.",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform integer in `0..n`.
    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

/// Row count from the first CLI argument; must be at least 1.
fn parse_row_count(arg: Option<String>) -> Result<usize> {
    let Some(arg) = arg else {
        return Ok(DEFAULT_ROWS);
    };
    let rows: usize = arg
        .parse()
        .with_context(|| format!("row count must be a positive integer, got {arg:?}"))?;
    ensure!(rows > 0, "row count must be a positive integer, got 0");
    Ok(rows)
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = parse_row_count(std::env::args().nth(1))?;

    let output_path = "sample_transcriptions.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;
    writer.write_record([
        "description",
        "medical_specialty",
        "sample_name",
        "transcription",
        "keywords",
    ])?;

    for i in 0..rows {
        let (specialty, terms) = SPECIALTIES[rng.below(SPECIALTIES.len())];

        let n_sentences = 1 + rng.below(SENTENCES.len());
        let transcription: Vec<&str> = (0..n_sentences)
            .map(|_| SENTENCES[rng.below(SENTENCES.len())])
            .collect();

        // Roughly one record in ten has no keywords at all.
        let keywords = if rng.below(10) == 0 {
            String::new()
        } else {
            let n_terms = 1 + rng.below(terms.len());
            (0..n_terms)
                .map(|_| terms[rng.below(terms.len())])
                .collect::<Vec<_>>()
                .join(", ")
        };

        let description = format!("{} consultation", terms[0]);
        let sample_name = format!("Sample {:04}", i + 1);
        writer.write_record([
            description.as_str(),
            specialty,
            sample_name.as_str(),
            transcription.join(" ").as_str(),
            keywords.as_str(),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {rows} records to {output_path}");
    Ok(())
}
