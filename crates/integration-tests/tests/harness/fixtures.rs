//! Canned vendor response bodies

/// Anthropic turn with signed thinking, text and a native tool call
pub const ANTHROPIC_SIGNED_TOOL_TURN: &str = r#"{"id":"msg_01","type":"message","role":"assistant","model":"claude-sonnet-4-20250514",
    "content":[
        {"type":"thinking","thinking":"The user wants the forecast.","signature":"EqQBCkYIARgCKkA+/sig=="},
        {"type":"text","text":"Checking the forecast."},
        {"type":"tool_use","id":"toolu_01","name":"forecast","input":{"city": "Oslo", "days":3}}
    ],
    "stop_reason":"tool_use"}"#;

/// Anthropic answer after the tool ran
pub const ANTHROPIC_ANSWER: &str = r#"{"id":"msg_02","type":"message","role":"assistant","model":"claude-sonnet-4-20250514",
    "content":[{"type":"text","text":"Rain all week."}],"stop_reason":"end_turn"}"#;

/// `OpenAI` turn with two native calls and no ids on the second
pub const OPENAI_PARALLEL_CALLS: &str = r#"{"id":"chatcmpl-9","model":"gpt-4.1","choices":[{"index":0,"message":{"role":"assistant","content":null,
    "tool_calls":[
        {"id":"call_a","type":"function","function":{"name":"search","arguments":"{\"q\":\"rust\"}"}},
        {"type":"function","function":{"name":"fetch","arguments":"{\"url\":\"https://example.com\"}"}}
    ]},"finish_reason":"tool_calls"}]}"#;

/// `OpenAI`-shaped turn with a bare JSON object call in the text
pub const OPENAI_JSON_IN_TEXT: &str = r#"{"model":"gpt-4o-mini","choices":[{"message":{"role":"assistant",
    "content":"Sure. {\"name\": \"convert\", \"arguments\": {\"amount\": 12.5, \"to\": \"EUR\"}}"}}]}"#;

/// Google turn with a thought summary and a signed function call
pub const GOOGLE_SIGNED_CALL: &str = r#"{"candidates":[{"content":{"role":"model","parts":[
    {"text":"Need the order status.","thought":true},
    {"functionCall":{"name":"lookup_order","args":{"order_id":"A-17"}},"thoughtSignature":"Q2lZQm9keQ=="}
]},"finishReason":"STOP"}],"modelVersion":"gemini-2.5-pro"}"#;

/// `DeepSeek` reasoning turn with a native call
pub const DEEPSEEK_TOOL_TURN: &str = r#"{"model":"deepseek-reasoner","choices":[{"message":{"role":"assistant",
    "reasoning_content":"I need today's rate.","content":"",
    "tool_calls":[{"id":"call_0","type":"function","function":{"name":"rate","arguments":"{\"pair\": \"USD/JPY\"}"}}]}}]}"#;

/// Kimi turn whose call leaked into the text as sentinel tokens
pub const KIMI_SENTINEL_TURN: &str = r#"{"model":"kimi-k2-0905","choices":[{"message":{"role":"assistant",
    "content":"I'll check. <|tool_calls_section_begin|><|tool_call_begin|>functions.get_weather:0<|tool_call_argument_begin|>{\"city\": \"Beijing\"}<|tool_call_end|><|tool_calls_section_end|>"}}]}"#;

/// `MiniMax` turn with inline reasoning and an XML call
pub const MINIMAX_XML_TURN: &str = r#"{"model":"MiniMax-M2","choices":[{"message":{"role":"assistant",
    "content":"<think>\nLook up both cities.\n</think>\n\n<minimax:tool_call>\n<invoke name=\"get_weather\">\n<parameter name=\"location\">Tokyo</parameter>\n<parameter name=\"days\">2</parameter>\n</invoke>\n<invoke name=\"get_weather\">\n<parameter name=\"location\">Osaka</parameter>\n<parameter name=\"days\">2</parameter>\n</invoke>\n</minimax:tool_call>"}}]}"#;

/// Streamed `DeepSeek` call split across argument fragments
pub const DEEPSEEK_STREAM: [&str; 5] = [
    r#"data: {"id":"c1","model":"deepseek-chat","choices":[{"index":0,"delta":{"role":"assistant","content":""}}]}"#,
    r#"data: {"choices":[{"index":0,"delta":{"tool_calls":[{"index":0,"id":"call_s","type":"function","function":{"name":"search","arguments":""}}]}}]}"#,
    r#"data: {"choices":[{"index":0,"delta":{"tool_calls":[{"index":0,"function":{"arguments":"{\"q\": "}}]}}]}"#,
    r#"data: {"choices":[{"index":0,"delta":{"tool_calls":[{"index":0,"function":{"arguments":"\"tokio\"}"}}]},"finish_reason":"tool_calls"}]}"#,
    "data: [DONE]",
];
