//! # Request Target
//! src/http/target.rs
//!
//! Descompone el target de la request line (`/path?query`) en el path
//! normalizado y la lista ordenada de query parameters.
//!
//! Los parámetros se guardan en orden de aparición y sin fusionar
//! duplicados: `?a=1&a=2` produce dos entradas.

/// Lista ordenada de pares `(nombre, valor)` decodificados de una query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Decodifica una query string cruda (sin el `?` inicial)
    ///
    /// Sigue la semántica de `application/x-www-form-urlencoded`:
    /// separa por `&`, luego por el primer `=`, aplica percent-decoding y
    /// convierte `+` en espacio tanto en el nombre como en el valor. Un
    /// segmento sin `=` produce un valor vacío.
    ///
    /// # Ejemplo
    /// ```
    /// use minihttp::http::target::QueryParams;
    ///
    /// let params = QueryParams::decode("name=hello+world&flag&n=%31");
    /// assert_eq!(params.first_value("name"), Some("hello world"));
    /// assert_eq!(params.first_value("flag"), Some(""));
    /// assert_eq!(params.first_value("n"), Some("1"));
    /// ```
    pub fn decode(raw: &str) -> Self {
        let pairs = form_urlencoded::parse(raw.as_bytes())
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();

        Self { pairs }
    }

    /// Retorna el valor del primer par cuyo nombre coincide, o `None`
    pub fn first_value(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Retorna todos los valores asociados a `name`, en orden
    pub fn all_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Target de un request ya separado en path y query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    path: String,
    query: QueryParams,
}

impl RequestTarget {
    /// Separa el target en el primer `?`.
    ///
    /// Retorna `None` si el path no empieza con `/`; el parser lo reporta
    /// como target malformado.
    pub fn parse(raw: &str) -> Option<Self> {
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, QueryParams::decode(query)),
            None => (raw, QueryParams::default()),
        };

        if !path.starts_with('/') {
            return None;
        }

        Some(Self {
            path: path.to_string(),
            query,
        })
    }

    /// Consume el target y retorna sus partes
    pub fn into_parts(self) -> (String, QueryParams) {
        (self.path, self.query)
    }
}
