#![no_main]

use healthkit_extract::extract::Dispatcher;
use healthkit_extract::schema::Category;
use healthkit_extract::xml::ElementReader;
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must produce elements or an error, never a panic
    let dispatcher = Dispatcher::new(&Category::ALL);
    let reader = ElementReader::new(Cursor::new(data));

    for element in reader.elements().take(10_000) {
        match element {
            Ok(element) => {
                for (_, record) in dispatcher.dispatch(&element) {
                    assert_eq!(record.values.len(), record.fields().len());
                }
            }
            Err(_) => break,
        }
    }
});
