use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The `{ success, data, message }` wrapper every backend response uses.
///
/// `success` is passed through untouched: callers decide what `false` means.
/// Read endpoints usually omit `message`; write endpoints set it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
	pub success: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

/// Returned by [`Envelope::into_data`] when the backend reported `success: false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("backend rejected the request: {message}")]
pub struct Rejected {
	pub message: String,
}

impl<T> Envelope<T> {
	pub fn ok(data: T) -> Self {
		Self {
			success: true,
			data: Some(data),
			message: None,
		}
	}

	pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
		Self {
			success: true,
			data: Some(data),
			message: Some(message.into()),
		}
	}

	pub fn failure(message: impl Into<String>) -> Self {
		Self {
			success: false,
			data: None,
			message: Some(message.into()),
		}
	}

	/// Payload of a successful envelope, `None` otherwise.
	pub fn accepted(self) -> Option<T> {
		if self.success { self.data } else { None }
	}

	/// Treats `success: false` (or a missing payload) as an error.
	pub fn into_data(self) -> Result<T, Rejected> {
		match (self.success, self.data) {
			(true, Some(data)) => Ok(data),
			(true, None) => Err(Rejected {
				message: self
					.message
					.unwrap_or_else(|| "response carried no data".to_string()),
			}),
			(false, _) => Err(Rejected {
				message: self.message.unwrap_or_else(|| "no message".to_string()),
			}),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn failure_envelope_without_data_decodes() {
		let env: Envelope<u32> =
			serde_json::from_str(r#"{"success":false,"message":"nope"}"#).unwrap();
		assert!(!env.success);
		assert_eq!(env.data, None);
		assert_eq!(env.clone().accepted(), None);
		assert_eq!(
			env.into_data(),
			Err(Rejected {
				message: "nope".to_string()
			})
		);
	}

	#[test]
	fn success_flag_is_not_interpreted_on_decode() {
		// A false flag with data still decodes; only accepted()/into_data() look at it.
		let env: Envelope<u32> = serde_json::from_str(r#"{"success":false,"data":7}"#).unwrap();
		assert_eq!(env.data, Some(7));
		assert_eq!(env.accepted(), None);
	}

	#[test]
	fn ok_envelope_skips_absent_message() {
		let json = serde_json::to_value(Envelope::ok(3)).unwrap();
		assert_eq!(json, serde_json::json!({"success": true, "data": 3}));
	}
}
