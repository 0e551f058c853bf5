use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform draw from [lo, hi).
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn bernoulli(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let sites = [
        "CCAFS LC-40",
        "CCAFS SLC-40",
        "KSC LC-39A",
        "VAFB SLC-4E",
    ];

    // Booster generation → (base success rate, payload span in kg).
    let boosters: [(&str, f64, (f64, f64)); 4] = [
        ("v1.0", 0.4, (0.0, 4000.0)),
        ("v1.1", 0.6, (500.0, 6000.0)),
        ("FT", 0.85, (1000.0, 9600.0)),
        ("B5", 0.95, (2000.0, 15600.0)),
    ];

    let mut all_site: Vec<String> = Vec::new();
    let mut all_payload: Vec<f64> = Vec::new();
    let mut all_booster: Vec<String> = Vec::new();
    let mut all_class: Vec<i64> = Vec::new();

    for &(booster, base_rate, (lo, hi)) in &boosters {
        for _ in 0..14 {
            let site = sites[(rng.next_u64() % sites.len() as u64) as usize];
            let payload = rng.uniform(lo, hi).round();
            // Heavier payloads drag the success odds down a little.
            let p = (base_rate - 0.1 * payload / hi).clamp(0.05, 0.98);
            let class = i64::from(rng.bernoulli(p));

            all_site.push(site.to_string());
            all_payload.push(payload);
            all_booster.push(booster.to_string());
            all_class.push(class);
        }
    }

    let n = all_site.len();

    // ---- CSV ----
    let csv_path = "launch_records.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    writer
        .write_record([
            "Launch Site",
            "Payload Mass (kg)",
            "Booster Version Category",
            "class",
        ])
        .expect("Failed to write CSV header");
    for i in 0..n {
        let payload = all_payload[i].to_string();
        let class = all_class[i].to_string();
        writer
            .write_record([
                all_site[i].as_str(),
                payload.as_str(),
                all_booster[i].as_str(),
                class.as_str(),
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV");

    // ---- Parquet ----
    let site_array = StringArray::from(
        all_site.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
    );
    let payload_array = Float64Array::from(all_payload);
    let booster_array = StringArray::from(
        all_booster.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
    );
    let class_array = Int64Array::from(all_class);

    let schema = Arc::new(Schema::new(vec![
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(site_array),
            Arc::new(payload_array),
            Arc::new(booster_array),
            Arc::new(class_array),
        ],
    )
    .expect("Failed to create RecordBatch");

    let parquet_path = "launch_records.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {n} launches to {csv_path} and {parquet_path}");
}
