/// Header plus three signal rows, with the trailing noise real producers send.
pub const THREE_SIGNALS_RAW: &str =
    "symbol,side,lots\r\nEURUSD,BUY,0.10\r\nUSDJPY,SELL,0.20\r\nGBPUSD,BUY,0.05\r\n\r\n\n";

/// [`THREE_SIGNALS_RAW`] after normalization.
pub const THREE_SIGNALS: &str =
    "symbol,side,lots\r\nEURUSD,BUY,0.10\r\nUSDJPY,SELL,0.20\r\nGBPUSD,BUY,0.05\n";

pub const HEADER_ONLY: &str = "symbol,side,lots\n";

pub fn feed_with_rows(rows: usize) -> String {
    let mut text = String::from("symbol,side,lots\n");
    for i in 0..rows {
        text.push_str(&format!("SYM{i},BUY,0.{i:02}\n"));
    }
    text
}
