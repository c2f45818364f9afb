// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::time::Duration;

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Defaults of the escher scheme.
pub const DEFAULT_ALGORITHM_PREFIX: &str = "ESR";
pub const DEFAULT_VENDOR_KEY: &str = "Escher";
pub const DEFAULT_CLOCK_SKEW: Duration = Duration::from_secs(300);

// Env values used by escher.
pub const ESCHER_ACCESS_KEY_ID: &str = "ESCHER_ACCESS_KEY_ID";
pub const ESCHER_SECRET: &str = "ESCHER_SECRET";
pub const ESCHER_CREDENTIAL_SCOPE: &str = "ESCHER_CREDENTIAL_SCOPE";
pub const ESCHER_ALGORITHM_PREFIX: &str = "ESCHER_ALGORITHM_PREFIX";
pub const ESCHER_HASH_ALGORITHM: &str = "ESCHER_HASH_ALGORITHM";

/// AsciiSet for query keys and values.
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
