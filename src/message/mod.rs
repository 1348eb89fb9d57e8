#![doc = r#"
Contains the byte-level vocabulary of track events

# Hierarchy
```text
                     |-------------|
                     | Track Event |
                     |-------------|
                /           |            \
|------------|   |----------------|   |------------------|
| MetaKind   |   | StatusType     |   | System Exclusive |
| (0xFF ..)  |   | (0x80..=0xFE)  |   | (0xF0 | 0xF7)    |
|------------|   |----------------|   |------------------|
```
"#]

mod meta;
pub use meta::*;

mod status;
pub use status::*;

mod program;
pub use program::*;

mod controller;
pub use controller::*;
