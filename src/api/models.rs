//! Request and response shapes exchanged with the UniEvents API.

// crates.io
use serde::Deserializer;
use time::Date;
// self
use crate::{_prelude::*, api::format};

/// Profile of the signed-in user (`GET /users/me`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Full name.
	#[serde(rename = "nome", default, deserialize_with = "null_as_default")]
	pub name: String,
	/// Account e-mail.
	#[serde(default, deserialize_with = "null_as_default")]
	pub email: String,
	/// Mobile number as stored by the API (digits only).
	#[serde(rename = "telefone", default)]
	pub phone: Option<String>,
}

/// Saved address belonging to the signed-in user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
	/// Address identifier.
	pub id: i64,
	/// Postal code (CEP).
	#[serde(default, deserialize_with = "null_as_default")]
	pub cep: String,
	/// Street name.
	#[serde(rename = "logradouro", default, deserialize_with = "null_as_default")]
	pub street: String,
	/// Street number.
	#[serde(rename = "numero", default, deserialize_with = "null_as_default")]
	pub number: String,
	/// Optional complement (apartment, block).
	#[serde(rename = "complemento", default)]
	pub complement: Option<String>,
	/// Neighborhood.
	#[serde(rename = "bairro", default, deserialize_with = "null_as_default")]
	pub district: String,
	/// City name.
	#[serde(rename = "nome_cidade", default, deserialize_with = "null_as_default")]
	pub city: String,
	/// State name.
	#[serde(rename = "nome_estado", default, deserialize_with = "null_as_default")]
	pub state: String,
	/// Whether this is the user's primary address.
	#[serde(rename = "endereco_primario", default, deserialize_with = "null_as_default")]
	pub primary: bool,
}

/// Envelope returned by `GET /users/enderecos`.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct AddressList {
	#[serde(rename = "enderecos", default, deserialize_with = "null_as_default")]
	pub(crate) addresses: Vec<Address>,
}

/// Address payload for `POST /users/create-endereco`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewAddress {
	/// Postal code; serialized as digits only.
	#[serde(serialize_with = "serialize_digits")]
	pub cep: String,
	/// Street name.
	#[serde(rename = "logradouro")]
	pub street: String,
	/// Street number.
	#[serde(rename = "numero")]
	pub number: String,
	/// Complement; serialized as an empty string when absent.
	#[serde(rename = "complemento", serialize_with = "serialize_or_empty")]
	pub complement: Option<String>,
	/// Neighborhood.
	#[serde(rename = "bairro")]
	pub district: String,
	/// City name, as listed by the locality endpoints.
	#[serde(rename = "nome_cidade")]
	pub city: String,
	/// State name, as listed by the locality endpoints.
	#[serde(rename = "nome_estado")]
	pub state: String,
	/// Marks the new address as primary.
	#[serde(rename = "endereco_primario")]
	pub primary: bool,
}

/// Profile payload for `PUT /users/update`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
	/// Full name.
	pub name: String,
	/// Account e-mail, written to both the person and the user record.
	pub email: String,
	/// Mobile number in any punctuation; sent as digits only.
	pub phone: String,
	/// New password; omitted from the payload when empty.
	pub password: Option<String>,
}
impl Serialize for ProfileUpdate {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		#[derive(Serialize)]
		struct Person<'a> {
			nome_completo: &'a str,
			email: &'a str,
			telefone_celular: String,
		}
		#[derive(Serialize)]
		struct Account<'a> {
			email: &'a str,
			#[serde(skip_serializing_if = "Option::is_none")]
			senha: Option<&'a str>,
		}
		#[derive(Serialize)]
		struct Payload<'a> {
			pessoa: Person<'a>,
			usuario: Account<'a>,
		}

		Payload {
			pessoa: Person {
				nome_completo: &self.name,
				email: &self.email,
				telefone_celular: format::digits_only(&self.phone),
			},
			usuario: Account {
				email: &self.email,
				senha: self.password.as_deref().filter(|password| !password.is_empty()),
			},
		}
		.serialize(serializer)
	}
}

/// Account payload for `POST /users/` (individual person).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewAccount {
	/// Full name.
	pub name: String,
	/// Trade name; may be empty.
	pub trade_name: String,
	/// CPF or CNPJ in any punctuation; sent as digits only.
	pub document: String,
	/// Account e-mail, written to both the person and the user record.
	pub email: String,
	/// Mobile number in any punctuation; sent as digits only.
	pub phone: String,
	/// Date of birth, sent as `YYYY-MM-DD`.
	pub birth_date: Date,
	/// Tax regime; may be empty.
	pub regime: String,
	/// Initial password.
	pub password: String,
}
impl Serialize for NewAccount {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		#[derive(Serialize)]
		struct Person<'a> {
			nome_completo: &'a str,
			fantasia: &'a str,
			cpf_cnpj: String,
			email: &'a str,
			telefone_celular: String,
			data_nascimento: String,
			regime: &'a str,
			tipo_pessoa: &'static str,
		}
		#[derive(Serialize)]
		struct Account<'a> {
			email: &'a str,
			senha: &'a str,
		}
		#[derive(Serialize)]
		struct Payload<'a> {
			pessoa: Person<'a>,
			usuario: Account<'a>,
		}

		let birth_date = self.birth_date;

		Payload {
			pessoa: Person {
				nome_completo: &self.name,
				fantasia: &self.trade_name,
				cpf_cnpj: format::digits_only(&self.document),
				email: &self.email,
				telefone_celular: format::digits_only(&self.phone),
				data_nascimento: format!(
					"{:04}-{:02}-{:02}",
					birth_date.year(),
					u8::from(birth_date.month()),
					birth_date.day()
				),
				regime: &self.regime,
				tipo_pessoa: "fisica",
			},
			usuario: Account { email: &self.email, senha: &self.password },
		}
		.serialize(serializer)
	}
}

/// Country listed by `GET /localidades/paises`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
	/// Country identifier.
	pub id: i64,
	/// Display name.
	#[serde(rename = "nome")]
	pub name: String,
	/// ISO country code.
	#[serde(rename = "codigo_iso", default)]
	pub iso_code: Option<String>,
}

/// State listed by `GET /localidades/estados`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
	/// State identifier.
	pub id: i64,
	/// Display name.
	#[serde(rename = "nome")]
	pub name: String,
	/// Owning country.
	#[serde(rename = "id_pais", default)]
	pub country_id: Option<i64>,
}

/// City listed by `GET /localidades/cidades`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
	/// City identifier.
	pub id: i64,
	/// Display name.
	#[serde(rename = "nome")]
	pub name: String,
	/// IBGE municipality code.
	#[serde(rename = "codigo_ibge", default)]
	pub ibge_code: Option<i64>,
	/// Owning state.
	#[serde(rename = "id_estado", default)]
	pub state_id: Option<i64>,
}

/// Reads an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn serialize_digits<S>(value: &str, serializer: S) -> Result<S::Ok, S::Error>
where
	S: serde::Serializer,
{
	serializer.serialize_str(&format::digits_only(value))
}

fn serialize_or_empty<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
	S: serde::Serializer,
{
	serializer.serialize_str(value.as_deref().unwrap_or_default())
}
