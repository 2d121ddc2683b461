use std::error::Error;
use std::fs::File;
use std::io::Read;

use log::debug;

use crate::dataloader::{TrainingDataset, TrainingExample};
use crate::err::NetError;
use crate::util::Float;

/// Reads comma separated numeric rows into a `TrainingDataset`.
///
/// Columns listed as outputs become `expected_outputs`, the rest become `input_values`,
/// both in file column order.
#[derive(Clone, Debug)]
pub struct CsvReader {
    has_headers: bool,
    delimiter: u8,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self {
            has_headers: false,
            delimiter: b',',
        }
    }
}

impl CsvReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// First row holds variable names
    pub fn has_headers(mut self, yes: bool) -> Self {
        self.has_headers = yes;
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn read_dataset(
        &self,
        filepath: &str,
        output_columns: &[usize],
    ) -> Result<TrainingDataset, Box<dyn Error>> {
        let file = File::open(filepath)?;
        let ds = self.read_from(file, output_columns)?;

        debug!(
            "Read {} examples from {}",
            ds.training_examples.len(),
            filepath
        );

        Ok(ds)
    }

    pub fn read_from<R: Read>(
        &self,
        reader: R,
        output_columns: &[usize],
    ) -> Result<TrainingDataset, Box<dyn Error>> {
        if output_columns.is_empty() {
            return Err(Box::new(NetError::InvalidFormat(
                "no output columns selected".to_string(),
            )));
        }

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(self.has_headers)
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut header_names = Vec::new();
        if self.has_headers {
            header_names = rdr.headers()?.iter().map(String::from).collect();
        }

        let mut examples = Vec::new();
        let mut width = 0;

        for row in rdr.records() {
            let row = row?;
            width = row.len();

            if let Some(bad) = output_columns.iter().find(|c| **c >= width) {
                return Err(Box::new(NetError::IndexOutOfRange {
                    index: *bad,
                    len: width,
                }));
            }

            let mut inp_vec = Vec::with_capacity(width);
            let mut out_vec = Vec::with_capacity(output_columns.len());

            for (idx, val) in row.iter().enumerate() {
                let val = val.parse::<Float>().map_err(|_| {
                    NetError::InvalidFormat(format!("non numeric value '{}' in column {}", val, idx))
                })?;

                if output_columns.contains(&idx) {
                    out_vec.push(val);
                } else {
                    inp_vec.push(val);
                }
            }

            examples.push(TrainingExample::new(inp_vec, out_vec));
        }

        let names = if header_names.is_empty() {
            (0..width).map(|i| format!("var{}", i)).collect()
        } else {
            header_names
        };

        let (out_names, mut variable_names): (Vec<(usize, String)>, Vec<(usize, String)>) = names
            .into_iter()
            .enumerate()
            .partition(|(idx, _)| output_columns.contains(idx));

        variable_names.extend(out_names);

        Ok(TrainingDataset {
            variable_names: variable_names.into_iter().map(|(_, n)| n).collect(),
            training_examples: examples,
            test_examples: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = "1.1,2.1,1.0,1.0\n0.3,3.2,3.2,0.2\n5.3,1.1,2.1,0.1\n";

    #[test]
    fn splits_rows_into_inputs_and_outputs() {
        let ds = CsvReader::new().read_from(INPUT.as_bytes(), &[2, 3]).unwrap();
        let ex = &ds.training_examples;

        assert_eq!(ex.len(), 3);
        assert_eq!(ex[0].input_values.to_vec(), vec![1.1, 2.1]);
        assert_eq!(ex[0].expected_outputs.to_vec(), vec![1.0, 1.0]);
        assert_eq!(ex[1].input_values.to_vec(), vec![0.3, 3.2]);
        assert_eq!(ex[1].expected_outputs.to_vec(), vec![3.2, 0.2]);
        assert_eq!(ex[2].input_values.to_vec(), vec![5.3, 1.1]);
        assert_eq!(ex[2].expected_outputs.to_vec(), vec![2.1, 0.1]);
        assert!(ds.test_examples.is_empty());
    }

    #[test]
    fn output_columns_may_sit_anywhere() {
        let ds = CsvReader::new().read_from(INPUT.as_bytes(), &[0, 2]).unwrap();

        assert_eq!(ds.training_examples[0].input_values.to_vec(), vec![2.1, 1.0]);
        assert_eq!(ds.training_examples[0].expected_outputs.to_vec(), vec![1.1, 1.0]);
        assert_eq!(ds.variable_names, vec!["var1", "var3", "var0", "var2"]);
    }

    #[test]
    fn header_row_names_variables() {
        let data = "a, b, label\n1, 2, 0\n3, 4, 1\n";
        let ds = CsvReader::new()
            .has_headers(true)
            .read_from(data.as_bytes(), &[2])
            .unwrap();

        assert_eq!(ds.variable_names, vec!["a", "b", "label"]);
        assert_eq!(ds.training_examples.len(), 2);
        assert_eq!(ds.training_examples[1].expected_outputs.to_vec(), vec![1.0]);
    }

    #[test]
    fn rejects_bad_input() {
        let out_of_range = CsvReader::new().read_from(INPUT.as_bytes(), &[4]);
        assert!(out_of_range.is_err());

        let non_numeric = CsvReader::new().read_from("1,x,2\n".as_bytes(), &[2]);
        assert!(non_numeric.is_err());

        let no_outputs = CsvReader::new().read_from(INPUT.as_bytes(), &[]);
        assert!(no_outputs.is_err());
    }
}
