// Trip request model: a start location and the employees to drop off

use serde::{Deserialize, Serialize};

use crate::error::OptimizeError;
use crate::models::Address;

/// One employee and the address they are dropped at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropOff {
    /// Name of the employee, if given
    #[serde(default)]
    pub name: Option<String>,

    /// Drop-off address
    pub address: Address,
}

impl DropOff {
    pub fn new<S: Into<String>>(address: S) -> Self {
        Self {
            name: None,
            address: address.into(),
        }
    }

    pub fn named<N: Into<String>, S: Into<String>>(name: N, address: S) -> Self {
        Self {
            name: Some(name.into()),
            address: address.into(),
        }
    }
}

/// A request as collected by the input layer
///
/// When `end` is absent the last drop-off is treated as the fixed end of the trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripRequest {
    pub start: Address,

    #[serde(default)]
    pub drop_offs: Vec<DropOff>,

    #[serde(default)]
    pub end: Option<Address>,
}

impl TripRequest {
    pub fn new<S: Into<String>>(start: S) -> Self {
        Self {
            start: start.into(),
            drop_offs: Vec::new(),
            end: None,
        }
    }

    pub fn add_drop_off(&mut self, drop_off: DropOff) {
        self.drop_offs.push(drop_off);
    }

    pub fn set_end<S: Into<String>>(&mut self, end: S) {
        self.end = Some(end.into());
    }

    /// Drop-offs with a non-blank address, in input order
    pub fn filled_drop_offs(&self) -> impl Iterator<Item = &DropOff> {
        self.drop_offs
            .iter()
            .filter(|drop_off| !drop_off.address.trim().is_empty())
    }

    /// Splits the request into `(start, end, stops)` for the optimizer
    pub fn endpoints(&self) -> Result<(Address, Address, Vec<Address>), OptimizeError> {
        let start = self.start.trim();
        if start.is_empty() {
            return Err(OptimizeError::InvalidInput(
                "start location is missing".to_string(),
            ));
        }

        let mut stops: Vec<Address> = self
            .filled_drop_offs()
            .map(|drop_off| drop_off.address.trim().to_string())
            .collect();

        let end = match self.end.as_deref().map(str::trim) {
            Some(end) if !end.is_empty() => end.to_string(),
            _ => stops.pop().ok_or_else(|| {
                OptimizeError::InvalidInput(
                    "at least one drop-off location is required besides the start".to_string(),
                )
            })?,
        };

        Ok((start.to_string(), end, stops))
    }

    /// Employee names dropped at the given address, joined for display
    pub fn label(&self, address: &str) -> Option<String> {
        let names: Vec<&str> = self
            .filled_drop_offs()
            .filter(|drop_off| drop_off.address.trim() == address)
            .filter_map(|drop_off| drop_off.name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .collect();

        if names.is_empty() {
            None
        } else {
            Some(names.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_request() -> TripRequest {
        let mut request = TripRequest::new("Office");
        request.add_drop_off(DropOff::named("Ann", "1 Oak St"));
        request.add_drop_off(DropOff::named("Bob", " "));
        request.add_drop_off(DropOff::named("Cid", "9 Elm St"));
        request
    }

    #[test]
    fn test_last_drop_off_becomes_end() {
        let (start, end, stops) = create_test_request().endpoints().unwrap();

        assert_eq!(start, "Office");
        assert_eq!(end, "9 Elm St");
        assert_eq!(stops, vec!["1 Oak St".to_string()]);
    }

    #[test]
    fn test_explicit_end_keeps_all_drop_offs() {
        let mut request = create_test_request();
        request.set_end("Depot");

        let (_, end, stops) = request.endpoints().unwrap();
        assert_eq!(end, "Depot");
        assert_eq!(stops.len(), 2);
    }

    #[test]
    fn test_missing_start_rejected() {
        let mut request = create_test_request();
        request.start = "  ".to_string();

        assert!(matches!(
            request.endpoints(),
            Err(OptimizeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_no_drop_offs_rejected() {
        let request = TripRequest::new("Office");

        assert!(matches!(
            request.endpoints(),
            Err(OptimizeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_labels() {
        let mut request = create_test_request();
        request.add_drop_off(DropOff::named("Dee", "1 Oak St"));
        request.add_drop_off(DropOff::new("5 Pine St"));

        assert_eq!(request.label("1 Oak St"), Some("Ann, Dee".to_string()));
        assert_eq!(request.label("5 Pine St"), None);
        assert_eq!(request.label("Office"), None);
    }
}
