use serde::{Deserialize, Serialize};
use serde_json::Value;

// Input schema for a single churn prediction. Field names must match the
// columns the model was trained on, so the wire names keep their original
// casing.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChurnRecord {
    #[serde(rename = "CreditScore")]
    pub credit_score: f64,
    #[serde(rename = "Age")]
    pub age: f64,
    #[serde(rename = "Tenure")]
    pub tenure: f64,
    #[serde(rename = "Balance")]
    pub balance: f64,
    #[serde(rename = "NumOfProducts")]
    pub num_of_products: f64,
    #[serde(rename = "IsActiveMember")]
    pub is_active_member: f64,
    #[serde(rename = "EstimatedSalary")]
    pub estimated_salary: f64,
    #[serde(rename = "Geography_France")]
    pub geography_france: f64,
    #[serde(rename = "Geography_Germany")]
    pub geography_germany: f64,
    #[serde(rename = "Geography_Spain")]
    pub geography_spain: f64,
    #[serde(rename = "Gender_Female")]
    pub gender_female: f64,
    #[serde(rename = "Gender_Male")]
    pub gender_male: f64,
}

impl ChurnRecord {
    // Column order expected by the model. Must not change.
    pub fn to_row(&self) -> [f64; 12] {
        [
            self.credit_score,
            self.age,
            self.tenure,
            self.balance,
            self.num_of_products,
            self.is_active_member,
            self.estimated_salary,
            self.geography_france,
            self.geography_germany,
            self.geography_spain,
            self.gender_female,
            self.gender_male,
        ]
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
}

// Request body understood by the model server: a list of rows, each row a
// list of values in column order.
#[derive(Debug, Serialize)]
pub struct InferencePayload {
    pub dataframe_records: Vec<Vec<Value>>,
}

impl InferencePayload {
    pub fn from_record(record: &ChurnRecord) -> Self {
        let row = record.to_row().iter().map(|&v| Value::from(v)).collect();
        Self {
            dataframe_records: vec![row],
        }
    }

    pub fn from_rows(rows: Vec<Vec<Value>>) -> Self {
        Self {
            dataframe_records: rows,
        }
    }
}

// Parses uploaded CSV text into payload rows. Every line is a data row (no
// header handling) and rows may differ in length; the model server is the
// one that decides whether the shape is acceptable.
pub fn rows_from_csv(text: &str) -> Result<Vec<Vec<Value>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(cell_value).collect());
    }
    Ok(rows)
}

// Numeric cells become JSON numbers, everything else stays text. Empty cells
// map to null.
fn cell_value(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = cell.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = cell.parse::<f64>() {
        if float.is_finite() {
            return Value::from(float);
        }
    }
    Value::from(cell)
}
