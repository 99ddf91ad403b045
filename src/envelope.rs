use serde::Serialize;

/// `{"status": "success", "results"?: n, "data": ...}` wrapper shared by every handler.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            results: None,
            data,
        }
    }

    pub fn list(results: usize, data: T) -> Self {
        Self {
            status: "success",
            results: Some(results),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_only_present_for_lists() {
        let one = serde_json::to_value(Envelope::success(1)).unwrap();
        assert_eq!(one, serde_json::json!({ "status": "success", "data": 1 }));

        let many = serde_json::to_value(Envelope::list(2, vec![1, 2])).unwrap();
        assert_eq!(many["results"], 2);
        assert_eq!(many["data"], serde_json::json!([1, 2]));
    }
}
