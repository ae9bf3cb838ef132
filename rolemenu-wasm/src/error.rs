// SPDX-License-Identifier: MIT OR Apache-2.0

/// Converts any error which implements `Display` into a JavaScript `Error` and returns it early.
macro_rules! jserr {
    ($l:expr) => {
        $l.map_err::<wasm_bindgen::JsValue, _>(|err| js_sys::Error::new(&format!("{}", err)).into())?
    };
}

pub(crate) use jserr;
