//! 终端交互
//!
//! 读写都是泛型的，测试里可以用内存缓冲代替 stdin / stdout。

use anyhow::{bail, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};

pub struct Prompter<R, W> {
    reader: R,
    writer: W,
}

impl Prompter<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> Prompter<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    async fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            bail!("输入已结束");
        }
        Ok(line.trim().to_string())
    }

    async fn print(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// 询问必填项，空输入时重复询问
    pub async fn ask(&mut self, question: &str) -> Result<String> {
        loop {
            self.print(&format!("{} ", question)).await?;
            let answer = self.read_line().await?;
            if !answer.is_empty() {
                return Ok(answer);
            }
        }
    }

    /// 询问选填项，空输入返回 None
    pub async fn ask_optional(&mut self, question: &str) -> Result<Option<String>> {
        self.print(&format!("{} ", question)).await?;
        let answer = self.read_line().await?;
        Ok(Some(answer).filter(|a| !a.is_empty()))
    }

    /// 从列表中选择一项（输入序号或原文）
    pub async fn select(&mut self, question: &str, options: &[String]) -> Result<String> {
        if options.is_empty() {
            bail!("没有可选项");
        }

        let mut menu = format!("{}\n", question);
        for (i, option) in options.iter().enumerate() {
            menu.push_str(&format!("  {}. {}\n", i + 1, option));
        }
        self.print(&menu).await?;

        loop {
            self.print("> ").await?;
            let answer = self.read_line().await?;
            if let Some(choice) = pick(&answer, options) {
                return Ok(choice.clone());
            }
            self.print(&format!("无效选择: {}\n", answer)).await?;
        }
    }

    /// 等待用户按回车
    pub async fn wait_for_enter(&mut self, message: &str) -> Result<()> {
        self.print(&format!("{}\n", message)).await?;
        self.read_line().await?;
        Ok(())
    }
}

fn pick<'a>(answer: &str, options: &'a [String]) -> Option<&'a String> {
    if let Ok(n) = answer.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| options.get(i));
    }
    options.iter().find(|o| o.eq_ignore_ascii_case(answer))
}
